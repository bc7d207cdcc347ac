use crate::analysis::decoder::{decode_record, decode_reply};
use crate::analysis::prompt::{build_messages, ImageInput, Subject};
use crate::analysis::records::{AnalysisKind, AnalysisRecord, FoodAnalysisResult, IngredientAnalysis};
use crate::error::Result;
use crate::llm::client::{ensure_credential, InferenceClient, ModelReply};
use crate::llm::gateways::{OpenAIConfig, OpenAIGateway};
use crate::settings::Settings;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

/// Food and ingredient analysis over a remote vision model.
///
/// Settings are passed per call as a read-only snapshot, so one analyzer can
/// serve any number of concurrent requests.
pub struct FoodAnalyzer {
    client: InferenceClient,
}

impl FoodAnalyzer {
    pub fn new(client: InferenceClient) -> Self {
        Self { client }
    }

    /// Analyzer talking to OpenAI with the given configuration
    pub fn openai(config: OpenAIConfig) -> Result<Self> {
        let gateway = OpenAIGateway::with_config(config)?;
        Ok(Self::new(InferenceClient::new(Arc::new(gateway))))
    }

    pub async fn analyze_food(
        &self,
        image: &ImageInput,
        settings: &Settings,
    ) -> Result<FoodAnalysisResult> {
        ensure_credential(&settings.api_key)?;
        let reply = self.request(&Subject::Image(image), settings).await?;
        decode_reply(AnalysisKind::Food, &reply)
    }

    /// Analyze the photo at `path`.
    ///
    /// The credential is checked before the file is read or re-encoded.
    pub async fn analyze_food_file(
        &self,
        path: impl AsRef<Path>,
        settings: &Settings,
    ) -> Result<FoodAnalysisResult> {
        ensure_credential(&settings.api_key)?;
        let image = ImageInput::from_path(path)?;
        self.analyze_food(&image, settings).await
    }

    pub async fn analyze_ingredient(
        &self,
        name: &str,
        settings: &Settings,
    ) -> Result<IngredientAnalysis> {
        ensure_credential(&settings.api_key)?;
        let reply = self.request(&Subject::Ingredient(name), settings).await?;
        decode_reply(AnalysisKind::Ingredient, &reply)
    }

    /// Analyze either kind of subject, decoding into the matching record
    pub async fn analyze(
        &self,
        subject: &Subject<'_>,
        settings: &Settings,
    ) -> Result<AnalysisRecord> {
        ensure_credential(&settings.api_key)?;
        let reply = self.request(subject, settings).await?;
        decode_record(subject.kind(), &reply)
    }

    async fn request(&self, subject: &Subject<'_>, settings: &Settings) -> Result<ModelReply> {
        let kind = subject.kind();
        let span = info_span!(
            "analysis",
            request_id = %Uuid::new_v4(),
            kind = kind.description(),
            language = settings.language.code()
        );

        async {
            let messages = build_messages(subject, settings.language);
            info!("Starting {}", kind.description());
            self.client
                .infer_reply(&messages, &settings.api_key, kind.max_tokens())
                .await
                .inspect(|_| info!("Received {} reply", kind.description()))
        }
        .instrument(span)
        .await
    }
}
