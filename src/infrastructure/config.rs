use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub upstreams: UpstreamsSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub listen: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageSettings {
    pub panels_path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UpstreamsSettings {
    pub uptime: UptimeSettings,
    pub container: ContainerSettings,
    pub cloud: CloudSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UptimeSettings {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ContainerSettings {
    pub base_url: String,
    pub api_key: String,
    pub endpoint_id: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CloudSettings {
    pub base_url: String,
    pub token: String,
}

pub fn load_settings() -> anyhow::Result<Settings> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/settings"))
        .add_source(config::Environment::with_prefix("OPS").separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}
