//! Instruction prompt sent to the extraction service.
//!
//! The wording shapes what the service answers. Any change to
//! [`PROMPT_TEMPLATE`] must bump [`PROMPT_VERSION`] and update the tests below.

use tracing::debug;

/// Version of [`PROMPT_TEMPLATE`].
pub const PROMPT_VERSION: u32 = 1;

/// Fixed instruction text. The extracted statement text is appended after it.
pub const PROMPT_TEMPLATE: &str = r#"Analise o seguinte extrato financeiro e transforme-o em um formato estruturado.
Para cada transação, identifique: a data, a descrição original, o valor, uma categoria
apropriada, e forneça uma explicação clara e simplificada do que significa esta transação.
Caso identifique tarifas bancárias ou cobranças que poderiam ser evitadas, destaque isso
na explicação. Retorne os dados no seguinte formato JSON:
{
  "statementDate": "Mês e Ano do Extrato",
  "totalAmount": valor total,
  "items": [
    {
      "id": "1",
      "date": "data no formato DD/MM",
      "description": "descrição clara",
      "amount": valor numérico,
      "category": "categoria",
      "explanation": "explicação simples e didática"
    }
  ]
}

Extrato para análise:
"#;

/// Renders the instruction prompt around extracted statement text.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Version of the template this builder renders.
    pub fn version(&self) -> u32 {
        PROMPT_VERSION
    }

    /// Render the prompt. `extracted_text` is embedded verbatim at the end.
    pub fn build(&self, extracted_text: &str) -> String {
        let mut prompt = String::with_capacity(PROMPT_TEMPLATE.len() + extracted_text.len());
        prompt.push_str(PROMPT_TEMPLATE);
        prompt.push_str(extracted_text);

        debug!(
            "Built prompt v{} ({} chars, {} from document)",
            PROMPT_VERSION,
            prompt.len(),
            extracted_text.len()
        );

        prompt
    }
}

/// Render the prompt with the default builder.
pub fn build_prompt(extracted_text: &str) -> String {
    PromptBuilder::new().build(extracted_text)
}
