use std::sync::Arc;

use dck_core::{config::Config, port::TelegramPort, reconciler};

use dck_telegram::GrammersTelegram;

#[tokio::main]
async fn main() -> Result<(), dck_core::Error> {
    dck_core::logging::init("dck")?;

    let cfg = Config::load()?;

    let client = dck_telegram::connect(&cfg).await?;
    let port: Arc<dyn TelegramPort> = Arc::new(GrammersTelegram::new(client));

    reconciler::announce(port.as_ref(), &cfg.target_chat).await?;

    reconciler::Reconciler::new(port, cfg.target_chat.clone(), cfg.target_user.clone())
        .run()
        .await
}
