//! Application State

use std::sync::Arc;

use crate::application::ports::{CredentialPort, EngineLoaderPort, SampleStagingPort};
use crate::application::{GenerateSpeechHandler, ModelGateway, VoiceResolver};

/// 应用状态
///
/// ModelGateway 为进程级单例；除此之外没有跨请求的可变状态
pub struct AppState {
    pub gateway: Arc<ModelGateway>,
    pub generate_handler: GenerateSpeechHandler,
    pub credentials: Arc<dyn CredentialPort>,
}

impl AppState {
    pub fn new(
        loader: Arc<dyn EngineLoaderPort>,
        staging: Arc<dyn SampleStagingPort>,
        credentials: Arc<dyn CredentialPort>,
    ) -> Self {
        let gateway = Arc::new(ModelGateway::new(loader));
        let resolver = VoiceResolver::new(staging, credentials.clone());

        Self {
            generate_handler: GenerateSpeechHandler::new(gateway.clone(), resolver),
            gateway,
            credentials,
        }
    }
}
