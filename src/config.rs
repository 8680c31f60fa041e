use std::env;

use log::LevelFilter;

macro_rules! from_environment {
    ($config:expr, $($key:expr, $name:tt),*$(,)?) => {{
        $(
            {
                if let Ok(value) = env::var($key) {
                    if let Ok(value) = value.parse() {
                        $config.$name = value;
                    }
                }
            }
        )*
    }};
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub database_path: String,
    pub host: String,
    pub port: u16,
    pub log_level: LevelFilter,
}

impl Config {
    /// Reads the config from the environment, keeping the default for any
    /// variable that is unset or fails to parse.
    pub fn from_environment() -> Self {
        Self::default().with_environment()
    }

    pub fn with_environment(mut self) -> Self {
        from_environment!(
            self,
            "DATABASE_PATH",
            database_path,
            "HOST",
            host,
            "PORT",
            port,
            "LOG_LEVEL",
            log_level,
        );
        self
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: "bracket-desk.db".into(),
            host: "0.0.0.0".into(),
            port: 3001,
            log_level: LevelFilter::Info,
        }
    }
}
