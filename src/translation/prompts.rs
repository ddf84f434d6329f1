/*!
 * Prompt templates for markdown translation.
 *
 * The system prompt locks the model into translate-only behavior: all
 * formatting is preserved and nothing but the translated result comes back.
 */

/// System prompt template for document translation.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    /// The template string with placeholders
    template: String,
}

impl PromptTemplate {
    /// The default system prompt for markdown translation.
    pub const MARKDOWN_TRANSLATOR: &'static str = "You are an expert technical translator. \
Translate the following content into **{target_language}**.\n\
Output only the translated result. \
Do not include any explanations or comments — only the translation.\n\n\
{instruction}\n";

    /// The default instruction appended to the system prompt.
    pub const MARKDOWN_INSTRUCTION: &'static str = "\
Translate the following technical Markdown document into the target language.\n\n\
Rules:\n\
1. Preserve all Markdown formatting exactly (headings, lists, tables, links, bold, italic, etc.).\n\
2. Translate human-readable prose: headings, paragraphs, list items, table cells, blockquotes.\n\
3. In code blocks: keep all code as-is. Only translate comments and user-facing string literals.\n\
4. Keep inline code unchanged unless it contains human-readable prose (e.g., UI labels).\n\
5. Keep URLs, file paths, and variable/function names unchanged.\n\
6. Preserve interpolation tokens and placeholders as-is (e.g., `{name}`, `%s`, `${var}`).\n\
7. Widely-adopted technical terms (e.g., API, SDK, GPU) may remain in English \
if that is conventional in the target language.\n";

    /// Create a new prompt template.
    pub fn new(template: &str) -> Self {
        Self {
            template: template.to_string(),
        }
    }

    /// Create the default markdown translator template.
    pub fn markdown_translator() -> Self {
        Self::new(Self::MARKDOWN_TRANSLATOR)
    }

    /// Render the template with the given target language and instruction.
    pub fn render(&self, target_language: &str, instruction: &str) -> String {
        self.template
            .replace("{target_language}", target_language)
            .replace("{instruction}", instruction)
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::markdown_translator()
    }
}
