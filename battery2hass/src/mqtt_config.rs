use serde_derive::Deserialize;

static DEFAULT_TOPIC_PREFIX: &str = "solar/";

#[derive(Clone, Debug, Default, Deserialize)]
pub struct MqttConfig {
    pub host: String,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub client_id: Option<String>,
    pub tls: Option<bool>,
    // prefix of the state topics, e.g. "solar/" yields "solar/battery/voltage"
    pub topic: Option<String>,
}

impl MqttConfig {
    pub fn is_valid(&self) -> bool {
        !self.host.is_empty()
    }

    pub fn prefix(&self) -> &str {
        self.topic.as_deref().unwrap_or(DEFAULT_TOPIC_PREFIX)
    }
}
