use config::{Config, ConfigError, Environment, File};
use std::sync::OnceLock;

use super::{AcademicsConfig, AppConfig};

static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

impl AppConfig {
    /// 加载配置
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            // 首先加载默认配置文件
            .add_source(File::with_name("config").required(false))
            // 然后根据环境加载特定配置文件
            .add_source(
                File::with_name(&format!(
                    "config.{}",
                    std::env::var("APP_ENV").unwrap_or_else(|_| "development".into())
                ))
                .required(false),
            )
            // 最后加载环境变量覆盖
            .add_source(
                Environment::with_prefix("SCHOOLHUB")
                    .separator("_")
                    .try_parsing(true),
            );

        // 支持从环境变量加载
        builder = builder
            .set_override_option("app.environment", std::env::var("APP_ENV").ok())?
            .set_override_option("app.log_level", std::env::var("RUST_LOG").ok())?
            .set_override_option("server.host", std::env::var("SERVER_HOST").ok())?
            .set_override_option("server.port", std::env::var("SERVER_PORT").ok())?
            .set_override_option("server.unix_socket_path", std::env::var("UNIX_SOCKET").ok())?
            .set_override_option("server.workers", std::env::var("CPU_COUNT").ok())?
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .set_override_option("cache.redis.url", std::env::var("REDIS_URL").ok())?
            .set_override_option(
                "cache.redis.key_prefix",
                std::env::var("REDIS_KEY_PREFIX").ok(),
            )?
            .set_override_option("cache.default_ttl", std::env::var("CACHE_TTL").ok())?;

        let config = builder.build()?;
        let mut app_config: AppConfig = config.try_deserialize()?;

        app_config
            .academics
            .validate()
            .map_err(|e| ConfigError::Message(format!("Invalid academics config: {e}")))?;

        // 处理工作线程数
        if app_config.server.workers == 0 {
            app_config.server.workers = num_cpus::get().min(app_config.server.max_workers);
        }

        Ok(app_config)
    }

    /// 获取全局配置实例
    pub fn get() -> &'static AppConfig {
        APP_CONFIG.get_or_init(|| {
            Self::load().unwrap_or_else(|e| {
                eprintln!("Failed to load configuration: {e}");
                std::process::exit(1);
            })
        })
    }

    /// 初始化配置 (在应用启动时调用)
    pub fn init() -> Result<(), ConfigError> {
        let config = Self::load()?;
        APP_CONFIG
            .set(config)
            .map_err(|_| ConfigError::Message("Configuration already initialized".to_string()))?;
        Ok(())
    }

    /// 检查是否为生产环境
    pub fn is_production(&self) -> bool {
        self.app.environment == "production"
    }

    /// 检查是否为开发环境
    pub fn is_development(&self) -> bool {
        self.app.environment == "development"
    }

    /// 获取服务器绑定地址
    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// 获取 Unix 套接字路径 (如果配置了)
    #[cfg(unix)]
    pub fn unix_socket_path(&self) -> Option<&str> {
        if self.server.unix_socket_path.is_empty() {
            None
        } else {
            Some(&self.server.unix_socket_path)
        }
    }
}

impl AcademicsConfig {
    /// 校验阈值关系：0 <= repeat_threshold <= promote_threshold <= 100
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=100.0).contains(&self.promote_threshold) {
            return Err("promote_threshold must be between 0 and 100".to_string());
        }
        if !(0.0..=100.0).contains(&self.repeat_threshold) {
            return Err("repeat_threshold must be between 0 and 100".to_string());
        }
        if self.repeat_threshold > self.promote_threshold {
            return Err("repeat_threshold must not exceed promote_threshold".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn academics(promote: f64, repeat: f64) -> AcademicsConfig {
        AcademicsConfig {
            promote_threshold: promote,
            repeat_threshold: repeat,
            max_failed_subjects: 1,
        }
    }

    #[test]
    fn test_academics_thresholds_valid() {
        assert!(academics(40.0, 25.0).validate().is_ok());
        assert!(academics(50.0, 50.0).validate().is_ok());
        assert!(academics(0.0, 0.0).validate().is_ok());
    }

    #[test]
    fn test_academics_thresholds_invalid() {
        assert!(academics(30.0, 40.0).validate().is_err());
        assert!(academics(120.0, 40.0).validate().is_err());
        assert!(academics(40.0, -1.0).validate().is_err());
    }
}
