//! End-to-end statement pipeline.
//!
//! File → text → prompt → service reply → located JSON → normalized
//! statement. Every stage error is returned unchanged; demo data is only
//! produced when the pipeline was built in demo mode.

use std::time::Instant;

use tracing::{debug, info};

use crate::client::{ExtractionClient, ReqwestTransport, Transport};
use crate::document::{PlaceholderTextExtractor, TextExtractor, UploadedFile};
use crate::error::{ConfigError, ExtractionError};
use crate::fallback::{FallbackKind, fallback};
use crate::locate::JsonLocator;
use crate::models::config::{ClareiaConfig, PipelineMode};
use crate::models::statement::ProcessedStatement;
use crate::normalize::normalize;
use crate::prompt::PromptBuilder;

/// Result type for pipeline runs.
pub type Result<T> = std::result::Result<T, ExtractionError>;

enum Backend<T> {
    Live(ExtractionClient<T>),
    Demo(FallbackKind),
}

/// The statement extraction pipeline.
///
/// Holds no per-request state; every call to [`process`](Self::process) is
/// independent.
pub struct StatementPipeline<T = ReqwestTransport> {
    backend: Backend<T>,
    extractor: Box<dyn TextExtractor>,
    prompt: PromptBuilder,
    locator: JsonLocator,
}

impl StatementPipeline<ReqwestTransport> {
    /// Build a pipeline from configuration.
    ///
    /// Live mode resolves the endpoint and credential immediately and fails
    /// if either is missing. Demo mode needs neither.
    pub fn from_config(config: &ClareiaConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;

        match config.pipeline.mode {
            PipelineMode::Live => {
                let service = config.service.resolve()?;
                Ok(Self::live(ExtractionClient::new(service, config.generation.clone())))
            }
            PipelineMode::Demo => Ok(Self::demo(config.pipeline.demo_dataset)),
        }
    }
}

impl<T: Transport> StatementPipeline<T> {
    /// Pipeline that calls the extraction service.
    pub fn live(client: ExtractionClient<T>) -> Self {
        Self::with_backend(Backend::Live(client))
    }

    /// Pipeline that returns the `kind` example dataset without any network access.
    pub fn demo(kind: FallbackKind) -> Self {
        Self::with_backend(Backend::Demo(kind))
    }

    fn with_backend(backend: Backend<T>) -> Self {
        Self {
            backend,
            extractor: Box::new(PlaceholderTextExtractor::new()),
            prompt: PromptBuilder::new(),
            locator: JsonLocator::new(),
        }
    }

    /// Replace the document text extractor.
    pub fn with_extractor(mut self, extractor: impl TextExtractor + 'static) -> Self {
        self.extractor = Box::new(extractor);
        self
    }

    /// Mode the pipeline was built in.
    pub fn mode(&self) -> PipelineMode {
        match self.backend {
            Backend::Live(_) => PipelineMode::Live,
            Backend::Demo(_) => PipelineMode::Demo,
        }
    }

    /// The extraction client, in live mode.
    pub fn client(&self) -> Option<&ExtractionClient<T>> {
        match &self.backend {
            Backend::Live(client) => Some(client),
            Backend::Demo(_) => None,
        }
    }

    /// Text and prompt that a live run would send for `file`.
    pub fn render_prompt(&self, file: &UploadedFile) -> String {
        let text = self.extractor.extract_text(file);
        self.prompt.build(&text)
    }

    /// Process one uploaded file.
    pub async fn process(&self, file: &UploadedFile) -> Result<ProcessedStatement> {
        let start = Instant::now();
        info!("Processing {} ({}, {} bytes)", file.name, file.media_type.as_str(), file.len());

        let statement = match &self.backend {
            Backend::Demo(kind) => demo_statement(*kind, file),
            Backend::Live(client) => {
                let prompt = self.render_prompt(file);
                let reply = client.call(&prompt).await?;
                debug!("Service reply has {} chars", reply.len());
                self.parse_reply(&reply)?
            }
        };

        info!(
            "Processed {} into {} items in {:?}",
            file.name,
            statement.items.len(),
            start.elapsed()
        );

        Ok(statement)
    }

    /// Locate and normalize the JSON payload in a service reply.
    pub fn parse_reply(&self, reply: &str) -> Result<ProcessedStatement> {
        let located = self.locator.locate(reply)?;
        normalize(&located.json)
    }
}

/// Locate and normalize the JSON payload in a service reply using the
/// standard strategy order.
pub fn parse_reply(reply: &str) -> Result<ProcessedStatement> {
    let located = JsonLocator::new().locate(reply)?;
    normalize(&located.json)
}

/// Example dataset labelled with the uploaded file's name.
fn demo_statement(kind: FallbackKind, file: &UploadedFile) -> ProcessedStatement {
    info!("Demo mode: returning {} example dataset", kind);

    let mut statement = fallback(kind);
    let stem = file.stem();
    if !stem.is_empty() {
        statement.statement_date = format!("{} - {}", statement.statement_date, stem);
    }
    statement
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::MediaType;
    use crate::models::config::ServiceConfig;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn upload(name: &str) -> UploadedFile {
        UploadedFile::new(name, MediaType::Pdf, b"%PDF".to_vec())
    }

    #[test]
    fn test_parse_reply_scenario() {
        let reply = "Here is the result:\n```json\n{\"statementDate\":\"Março 2023\",\"items\":[{\"date\":\"04/03\",\"description\":\"Seguro\",\"amount\":29.9,\"category\":\"seguro\",\"explanation\":\"x\"}]}\n```";
        let statement = parse_reply(reply).unwrap();

        assert_eq!(statement.statement_date, "Março 2023");
        assert_eq!(statement.total_amount, dec!(29.9));
        assert_eq!(statement.items.len(), 1);
        assert_eq!(statement.items[0].id, "1");
        assert_eq!(statement.items[0].explanation, "x");
    }

    #[test]
    fn test_parse_reply_propagates_stage_errors() {
        assert!(matches!(parse_reply("nada aqui"), Err(ExtractionError::NoJsonFound)));
        assert!(matches!(
            parse_reply("{\"statementDate\":\"X\"}"),
            Err(ExtractionError::SchemaValidation(_))
        ));
        assert!(matches!(
            parse_reply("```json\n{\"statementDate\": }\n```"),
            Err(ExtractionError::JsonParse(_))
        ));
    }

    #[tokio::test]
    async fn test_demo_mode_labels_dataset_with_file_stem() {
        let pipeline: StatementPipeline = StatementPipeline::demo(FallbackKind::BankStatement);
        assert_eq!(pipeline.mode(), PipelineMode::Demo);

        let statement = pipeline.process(&upload("extrato-marco.pdf")).await.unwrap();
        assert_eq!(statement.statement_date, "Março 2023 - extrato-marco");
        assert_eq!(statement.items, fallback(FallbackKind::BankStatement).items);
    }

    #[tokio::test]
    async fn test_demo_label_stops_at_first_dot() {
        let pipeline: StatementPipeline = StatementPipeline::demo(FallbackKind::BankStatement);

        let statement = pipeline.process(&upload("extrato.marco.pdf")).await.unwrap();
        assert_eq!(statement.statement_date, "Março 2023 - extrato");

        let statement = pipeline.process(&upload(".pdf")).await.unwrap();
        assert_eq!(statement.statement_date, "Março 2023");
    }

    #[test]
    fn test_render_prompt_embeds_placeholder() {
        let pipeline: StatementPipeline = StatementPipeline::demo(FallbackKind::UtilityBill);
        let prompt = pipeline.render_prompt(&upload("conta.pdf"));
        assert!(prompt.ends_with("Conteúdo do documento PDF: conta.pdf"));
    }

    #[test]
    fn test_from_config_demo_needs_no_credential() {
        let mut config = ClareiaConfig::default();
        config.pipeline.mode = PipelineMode::Demo;
        config.service = ServiceConfig {
            api_key_env: "CLAREIA_TEST_UNSET_KEY_VARIABLE".to_string(),
            ..ServiceConfig::default()
        };

        let pipeline = StatementPipeline::from_config(&config).unwrap();
        assert_eq!(pipeline.mode(), PipelineMode::Demo);
    }

    #[test]
    fn test_from_config_live_fails_fast_without_credential() {
        let mut config = ClareiaConfig::default();
        config.service.endpoint = Some("https://service.test/generate".to_string());
        config.service.api_key_env = "CLAREIA_TEST_UNSET_KEY_VARIABLE".to_string();

        let err = StatementPipeline::from_config(&config).err().unwrap();
        assert!(matches!(err, ConfigError::MissingCredential(_)));
    }
}
