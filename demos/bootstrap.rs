use std::sync::Arc;

use dotstore::{AppContext, Config, ConfigAware, DotPathStore};

#[derive(Default)]
struct HttpServer {
    config: Option<Arc<DotPathStore>>,
}

impl ConfigAware for HttpServer {
    fn set_config(&mut self, config: Arc<DotPathStore>) {
        self.config = Some(config);
    }
}

impl HttpServer {
    fn describe(&self) -> Result<String, dotstore::Error> {
        let Some(config) = &self.config else {
            return Ok("unconfigured".to_string());
        };
        let host: String = config.get_as("http.host")?.unwrap_or_default();
        let port: u16 = config.get_as("http.port")?.unwrap_or(80);
        Ok(format!("{host}:{port}"))
    }
}

fn main() -> Result<(), dotstore::Error> {
    let ctx = AppContext::builder()
        .with_config_builder(
            Config::builder()
                .with_env_file("demos/demo.env")
                .with_file("demos/config.toml"),
        )?
        .build()?;

    let config = ctx.config();
    println!(
        "{} ({})",
        config.get_as::<String>("name")?.unwrap_or_default(),
        config.get_as::<String>("env.environment")?.unwrap_or_default()
    );
    println!(
        "database: {}",
        config.get_as::<String>("env.database.host")?.unwrap_or_default()
    );
    println!(
        "second worker queue: {}",
        config.get_as::<String>("workers.1.queue")?.unwrap_or_default()
    );

    let server: HttpServer = ctx.resolve();
    println!("listening on {}", server.describe()?);

    Ok(())
}
