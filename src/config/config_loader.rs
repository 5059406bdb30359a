use anyhow::{Context, Result};

use super::config_model::{Auth, Database, DotEnvyConfig, PaymentGateway, Server};

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let server = Server {
        port: std::env::var("SERVER_PORT")
            .context("SERVER_PORT is invalid")?
            .parse()?,
        body_limit: std::env::var("SERVER_BODY_LIMIT")
            .context("SERVER_BODY_LIMIT is invalid")?
            .parse()?,
        timeout: std::env::var("SERVER_TIMEOUT")
            .context("SERVER_TIMEOUT is invalid")?
            .parse()?,
    };

    let database = Database {
        url: std::env::var("DATABASE_URL").context("DATABASE_URL is invalid")?,
    };

    let auth = Auth {
        jwt_secret: std::env::var("JWT_SECRET").context("JWT_SECRET is invalid")?,
    };

    let payment_gateway = PaymentGateway {
        webhook_secret: std::env::var("PAYMENT_GATEWAY_WEBHOOK_SECRET")
            .context("PAYMENT_GATEWAY_WEBHOOK_SECRET is invalid")?,
    };

    Ok(DotEnvyConfig {
        server,
        database,
        auth,
        payment_gateway,
    })
}
