use crate::config::PublisherConfig;
use crate::relay::SidecarPublisher;

#[derive(Clone)]
pub struct AppState {
    publisher: SidecarPublisher,
}

impl AppState {
    pub fn new(config: &PublisherConfig) -> Self {
        Self {
            publisher: SidecarPublisher::new(config),
        }
    }

    pub fn publisher(&self) -> &SidecarPublisher {
        &self.publisher
    }
}
