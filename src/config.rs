use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub withdrawal: WithdrawalConfig,
    pub order_webhook: OrderWebhookConfig,
    #[serde(default)]
    pub notification: NotificationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expires_in: i64, // seconds
}

/// 提现金额限制（美分）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawalConfig {
    #[serde(default = "default_min_withdrawal")]
    pub min_amount: i64,
    #[serde(default = "default_max_withdrawal")]
    pub max_amount: i64,
}

fn default_min_withdrawal() -> i64 {
    5_000 // $50.00
}

fn default_max_withdrawal() -> i64 {
    1_000_000 // $10,000.00
}

impl Default for WithdrawalConfig {
    fn default() -> Self {
        Self {
            min_amount: default_min_withdrawal(),
            max_amount: default_max_withdrawal(),
        }
    }
}

/// 订单完成事件 webhook 的 HMAC 密钥
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderWebhookConfig {
    pub secret: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NotificationConfig {
    #[serde(default)]
    pub webhook_url: Option<String>,
}

impl Config {
    pub fn from_toml() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        // 尝试读取配置文件，如果不存在则完全依赖环境变量
        let config_result = std::fs::read_to_string(&config_path);

        let mut config: Config = match config_result {
            Ok(config_str) => {
                // 有配置文件：先解析再用环境变量覆盖
                toml::from_str(&config_str).map_err(|e| format!("解析配置文件失败: {e}"))?
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                // 无配置文件：使用环境变量与默认值构建
                fn get_env(name: &str) -> Option<String> {
                    env::var(name).ok()
                }
                fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
                    env::var(name)
                        .ok()
                        .and_then(|v| v.parse::<T>().ok())
                        .unwrap_or(default)
                }

                // 数据库 URL 在无配置文件时必须提供
                let database_url = get_env("DATABASE_URL")
                    .ok_or("缺少 DATABASE_URL 环境变量，且未找到配置文件 config.toml")?;

                Config {
                    server: ServerConfig {
                        host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                        port: get_env_parse("SERVER_PORT", 8080u16),
                    },
                    database: DatabaseConfig {
                        url: database_url,
                        max_connections: get_env_parse("DB_MAX_CONNECTIONS", 10u32),
                    },
                    jwt: JwtConfig {
                        secret: get_env("JWT_SECRET")
                            .unwrap_or_else(|| "change-me-in-production".to_string()),
                        access_token_expires_in: get_env_parse("JWT_ACCESS_EXPIRES_IN", 7200i64),
                    },
                    withdrawal: WithdrawalConfig {
                        min_amount: get_env_parse("WITHDRAWAL_MIN_AMOUNT", default_min_withdrawal()),
                        max_amount: get_env_parse("WITHDRAWAL_MAX_AMOUNT", default_max_withdrawal()),
                    },
                    order_webhook: OrderWebhookConfig {
                        secret: get_env("ORDER_WEBHOOK_SECRET").unwrap_or_default(),
                    },
                    notification: NotificationConfig {
                        webhook_url: get_env("NOTIFICATION_WEBHOOK_URL"),
                    },
                }
            }
            Err(e) => {
                return Err(format!("无法读取配置文件 {config_path}: {e}").into());
            }
        };

        // 环境变量覆盖（即便文件存在时也覆盖）
        if let Ok(v) = env::var("SERVER_HOST") {
            config.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            config.server.port = p;
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            config.database.url = v;
        }
        if let Ok(v) = env::var("DB_MAX_CONNECTIONS")
            && let Ok(mc) = v.parse()
        {
            config.database.max_connections = mc;
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            config.jwt.secret = v;
        }
        if let Ok(v) = env::var("JWT_ACCESS_EXPIRES_IN")
            && let Ok(n) = v.parse()
        {
            config.jwt.access_token_expires_in = n;
        }
        if let Ok(v) = env::var("WITHDRAWAL_MIN_AMOUNT")
            && let Ok(n) = v.parse()
        {
            config.withdrawal.min_amount = n;
        }
        if let Ok(v) = env::var("WITHDRAWAL_MAX_AMOUNT")
            && let Ok(n) = v.parse()
        {
            config.withdrawal.max_amount = n;
        }
        if let Ok(v) = env::var("ORDER_WEBHOOK_SECRET") {
            config.order_webhook.secret = v;
        }
        if let Ok(v) = env::var("NOTIFICATION_WEBHOOK_URL") {
            config.notification.webhook_url = Some(v);
        }

        if config.withdrawal.min_amount <= 0 || config.withdrawal.max_amount < config.withdrawal.min_amount {
            return Err("提现金额限制配置无效 (min_amount/max_amount)".into());
        }

        Ok(config)
    }
}
