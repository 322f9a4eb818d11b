//! Prompt augmentation.

use ideaprobe_output::render_example;
use ideaprobe_schema::Schema;

/// Instruction placed between the caller's prompt and the example.
pub const EXAMPLE_INSTRUCTION: &str =
    "Respond only with JSON that matches the structure of this example:";

/// Append a freshly synthesized example of `schema` to `prompt`.
///
/// # Example
///
/// ```rust
/// use ideaprobe_generate::augment_prompt;
/// use ideaprobe_schema::Schema;
///
/// let schema = Schema::builder("KeywordSet").string_list("keywords").build()?;
/// let prompt = augment_prompt("Suggest search keywords.", &schema);
///
/// assert!(prompt.starts_with("Suggest search keywords.\n\n"));
/// assert!(prompt.ends_with(r#"{"keywords":["generated text 1","generated text 2"]}"#));
/// # Ok::<(), ideaprobe_schema::SchemaError>(())
/// ```
#[must_use]
pub fn augment_prompt(prompt: &str, schema: &Schema) -> String {
    format!(
        "{}\n\n{}\n{}",
        prompt,
        EXAMPLE_INSTRUCTION,
        render_example(schema)
    )
}
