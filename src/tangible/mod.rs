//! Tangible: typed interactions over a chat-completion backend.
//!
//! DESIGN
//! ======
//! Every `expect_*` method follows the same shape: build a prompt plus a
//! response-format description, run one interaction (reasoning turns and tool
//! calls included), then parse the final reply into the requested type. A
//! reply that does not parse is a `Failure` response, not an error; the
//! caller keeps the history and may continue from it.
//!
//! Option variants prefix the format with an "I don't know" escape and map
//! such replies to `Success(None)`.

pub mod interact;
pub mod lists;
pub mod parse;
pub mod prompt;
pub mod response;
pub mod table;

#[cfg(test)]
pub(crate) mod test_helpers;

use std::fmt::Display;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::llm::config::{DEFAULT_MAX_TOOL_ROUNDS, LlmConfig};
use crate::llm::types::{LlmError, Message};
use crate::llm::{ChatCompletion, LlmClient};

pub use interact::InteractionOptions;
use interact::Interaction;
pub use lists::ItemGroup;
pub use prompt::ReasoningStrategy;
pub use response::{TangibleError, TangibleOptionResponse, TangibleResponse};
pub use table::{Cell, Column, Row, Table};

/// Typed client over any [`ChatCompletion`] backend.
#[derive(Clone)]
pub struct TangibleClient {
    llm: Arc<dyn ChatCompletion>,
    max_tool_rounds: usize,
}

impl TangibleClient {
    pub fn new(llm: Arc<dyn ChatCompletion>) -> Self {
        Self { llm, max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS }
    }

    /// Build a client backed by the OpenAI-compatible transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let llm = LlmClient::from_config(config)?;
        Ok(Self::new(Arc::new(llm)).with_max_tool_rounds(config.max_tool_rounds))
    }

    #[must_use]
    pub fn with_max_tool_rounds(mut self, max_tool_rounds: usize) -> Self {
        self.max_tool_rounds = max_tool_rounds;
        self
    }

    #[must_use]
    pub fn max_tool_rounds(&self) -> usize {
        self.max_tool_rounds
    }

    // =========================================================================
    // TEXT
    // =========================================================================

    /// The reply text as-is.
    ///
    /// # Errors
    ///
    /// Returns [`TangibleError`] if the interaction aborts.
    pub async fn expect_plain_text(
        &self,
        prompt: &str,
        options: &InteractionOptions,
    ) -> Result<TangibleResponse<String>, TangibleError> {
        let interaction = self.interact(prompt, None, options).await?;
        let reply = interaction.reply.clone();
        Ok(interaction.success(reply))
    }

    /// # Errors
    ///
    /// Returns [`TangibleError`] if the interaction aborts.
    pub async fn expect_plain_text_option(
        &self,
        prompt: &str,
        options: &InteractionOptions,
    ) -> Result<TangibleOptionResponse<String>, TangibleError> {
        let interaction = self
            .interact(prompt, Some(prompt::I_DONT_KNOW_FORMAT), options)
            .await?;
        Ok(option_response(interaction, |reply| Some(reply.to_string()), ""))
    }

    /// Continue a conversation with an adjustment instruction.
    ///
    /// # Errors
    ///
    /// Returns [`TangibleError`] if the interaction aborts.
    pub async fn continue_conversation(
        &self,
        instruction: &str,
        history: &[Message],
        reasoning: ReasoningStrategy,
    ) -> Result<TangibleResponse<String>, TangibleError> {
        let options = InteractionOptions::new()
            .with_history(history.to_vec())
            .with_reasoning(reasoning);
        self.expect_plain_text(&prompt::adjustment_prompt(instruction), &options)
            .await
    }

    // =========================================================================
    // SCALARS
    // =========================================================================

    /// # Errors
    ///
    /// Returns [`TangibleError`] if the interaction aborts.
    pub async fn expect_boolean(
        &self,
        prompt: &str,
        options: &InteractionOptions,
    ) -> Result<TangibleResponse<bool>, TangibleError> {
        let interaction = self
            .interact(prompt, Some(prompt::BOOLEAN_FORMAT), options)
            .await?;
        let parsed = parse::parse_boolean(&interaction.reply);
        Ok(interaction.respond(parsed, "Could not parse boolean"))
    }

    /// # Errors
    ///
    /// Returns [`TangibleError`] if the interaction aborts.
    pub async fn expect_boolean_option(
        &self,
        prompt: &str,
        options: &InteractionOptions,
    ) -> Result<TangibleOptionResponse<bool>, TangibleError> {
        let format = prompt::option_format(prompt::BOOLEAN_FORMAT);
        let interaction = self.interact(prompt, Some(&format), options).await?;
        Ok(option_response(interaction, parse::parse_boolean, "Could not parse boolean"))
    }

    /// # Errors
    ///
    /// Returns [`TangibleError`] if the interaction aborts.
    pub async fn expect_number(
        &self,
        prompt: &str,
        options: &InteractionOptions,
    ) -> Result<TangibleResponse<f64>, TangibleError> {
        let interaction = self
            .interact(prompt, Some(prompt::NUMBER_FORMAT), options)
            .await?;
        let parsed = parse::parse_number(&interaction.reply);
        Ok(interaction.respond(parsed, "Could not parse number"))
    }

    /// # Errors
    ///
    /// Returns [`TangibleError`] if the interaction aborts.
    pub async fn expect_number_option(
        &self,
        prompt: &str,
        options: &InteractionOptions,
    ) -> Result<TangibleOptionResponse<f64>, TangibleError> {
        let format = prompt::option_format(prompt::NUMBER_FORMAT);
        let interaction = self.interact(prompt, Some(&format), options).await?;
        Ok(option_response(interaction, parse::parse_number, "Could not parse number"))
    }

    // =========================================================================
    // ENUMERATIONS
    // =========================================================================

    /// One of `cases`, matched on display form, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`TangibleError`] if the interaction aborts.
    pub async fn expect_enum_case<T: Display + Clone>(
        &self,
        prompt: &str,
        cases: &[T],
        options: &InteractionOptions,
    ) -> Result<TangibleResponse<T>, TangibleError> {
        let format = prompt::enum_case_format(&prompt::options_description(cases));
        let interaction = self.interact(prompt, Some(&format), options).await?;
        let parsed = parse::parse_enum_case(&interaction.reply, cases).cloned();
        Ok(interaction.respond(parsed, "Could not parse enum case"))
    }

    /// # Errors
    ///
    /// Returns [`TangibleError`] if the interaction aborts.
    pub async fn expect_enum_case_option<T: Display + Clone>(
        &self,
        prompt: &str,
        cases: &[T],
        options: &InteractionOptions,
    ) -> Result<TangibleOptionResponse<T>, TangibleError> {
        let format = prompt::option_format(&prompt::enum_case_format(&prompt::options_description(cases)));
        let interaction = self.interact(prompt, Some(&format), options).await?;
        Ok(option_response(
            interaction,
            |reply| parse::parse_enum_case(reply, cases).cloned(),
            "Could not parse enum case",
        ))
    }

    /// The subset of `cases` that applies, in `cases` order.
    ///
    /// # Errors
    ///
    /// Returns [`TangibleError`] if the interaction aborts.
    pub async fn expect_enum_cases<T: Display + Clone>(
        &self,
        prompt: &str,
        cases: &[T],
        options: &InteractionOptions,
    ) -> Result<TangibleResponse<Vec<T>>, TangibleError> {
        let format = prompt::enum_cases_format(&prompt::options_description(cases));
        let interaction = self.interact(prompt, Some(&format), options).await?;
        let parsed = parse::parse_enum_cases(&interaction.reply, cases)
            .map(|matched| matched.into_iter().cloned().collect());
        Ok(interaction.respond(parsed, "Could not parse enum cases"))
    }

    // =========================================================================
    // LISTS
    // =========================================================================

    /// One item per non-empty reply line.
    ///
    /// # Errors
    ///
    /// Returns [`TangibleError`] if the interaction aborts.
    pub async fn expect_items(
        &self,
        prompt: &str,
        options: &InteractionOptions,
    ) -> Result<TangibleResponse<Vec<String>>, TangibleError> {
        let interaction = self
            .interact(prompt, Some(prompt::ITEMS_FORMAT), options)
            .await?;
        let items = parse::parse_items(&interaction.reply);
        Ok(interaction.success(items))
    }

    /// # Errors
    ///
    /// Returns [`TangibleError`] if the interaction aborts.
    pub async fn expect_sorted(
        &self,
        items: &[String],
        criteria: Option<&str>,
        options: &InteractionOptions,
    ) -> Result<TangibleResponse<Vec<String>>, TangibleError> {
        let prompt = prompt::sort_prompt(items, criteria);
        let interaction = self
            .interact(&prompt, Some(prompt::SORTED_FORMAT), options)
            .await?;
        Ok(json_response(interaction, "Could not parse sorted items"))
    }

    /// The original items followed by `count` new ones.
    ///
    /// # Errors
    ///
    /// Returns [`TangibleError`] if the interaction aborts.
    pub async fn expect_extended_items(
        &self,
        items: &[String],
        count: usize,
        options: &InteractionOptions,
    ) -> Result<TangibleResponse<Vec<String>>, TangibleError> {
        let prompt = prompt::extend_prompt(items, count);
        let format = prompt::extended_format(count);
        let interaction = self.interact(&prompt, Some(&format), options).await?;
        Ok(json_response(interaction, "Could not parse extended items"))
    }

    /// # Errors
    ///
    /// Returns [`TangibleError`] if the interaction aborts.
    pub async fn expect_filtered(
        &self,
        items: &[String],
        predicate: &str,
        options: &InteractionOptions,
    ) -> Result<TangibleResponse<Vec<String>>, TangibleError> {
        let prompt = prompt::filter_prompt(items, predicate);
        let interaction = self
            .interact(&prompt, Some(prompt::FILTERED_FORMAT), options)
            .await?;
        Ok(json_response(interaction, "Could not parse filtered items"))
    }

    /// Distribute `items` into groups, named by `group_names` or by the model.
    ///
    /// # Errors
    ///
    /// Returns [`TangibleError`] if the interaction aborts.
    pub async fn expect_groups(
        &self,
        items: &[String],
        group_names: Option<&[String]>,
        criteria: Option<&str>,
        options: &InteractionOptions,
    ) -> Result<TangibleResponse<Vec<ItemGroup>>, TangibleError> {
        let prompt = prompt::groups_prompt(items, group_names, criteria);
        let format = prompt::json_format(&groups_example());
        let interaction = self.interact(&prompt, Some(&format), options).await?;
        Ok(json_response(interaction, "Could not parse groups"))
    }

    // =========================================================================
    // JSON
    // =========================================================================

    /// Decode the reply into the type of `example`, shown to the model as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`TangibleError`] if the interaction aborts.
    pub async fn expect_json<R: Serialize + DeserializeOwned>(
        &self,
        prompt: &str,
        example: &R,
        options: &InteractionOptions,
    ) -> Result<TangibleResponse<R>, TangibleError> {
        let format = prompt::json_format(&example_json(example)?);
        let interaction = self.interact(prompt, Some(&format), options).await?;
        Ok(json_response(interaction, "Could not parse JSON"))
    }

    /// # Errors
    ///
    /// Returns [`TangibleError`] if the interaction aborts.
    pub async fn expect_json_option<R: Serialize + DeserializeOwned>(
        &self,
        prompt: &str,
        example: &R,
        options: &InteractionOptions,
    ) -> Result<TangibleOptionResponse<R>, TangibleError> {
        let format = prompt::option_format(&prompt::json_format(&example_json(example)?));
        let interaction = self.interact(prompt, Some(&format), options).await?;
        Ok(option_response(interaction, |reply| parse::parse_json(reply).ok(), "Could not parse JSON"))
    }

    // =========================================================================
    // TABLES
    // =========================================================================

    /// # Errors
    ///
    /// Returns [`TangibleError`] if the interaction aborts.
    pub async fn expect_table(
        &self,
        prompt: &str,
        columns: &[Column],
        options: &InteractionOptions,
    ) -> Result<TangibleResponse<Table>, TangibleError> {
        let format = prompt::table_format(columns);
        let interaction = self.interact(prompt, Some(&format), options).await?;
        let parsed = table::parse_table(columns, &interaction.reply);
        Ok(interaction.respond(parsed, "Could not parse table"))
    }

    /// The table with `column` appended, filled per `intention`.
    ///
    /// # Errors
    ///
    /// Returns [`TangibleError`] if the interaction aborts.
    pub async fn expect_table_with_added_column(
        &self,
        column: Column,
        intention: &str,
        table: &Table,
        options: &InteractionOptions,
    ) -> Result<TangibleResponse<Table>, TangibleError> {
        let prompt = prompt::added_column_prompt(table, &column, intention);
        let mut columns = table.columns.clone();
        columns.push(column);
        self.expect_table(&prompt, &columns, options).await
    }

    /// The table with one row appended as its last row.
    ///
    /// # Errors
    ///
    /// Returns [`TangibleError`] if the interaction aborts.
    pub async fn expect_table_with_added_row(
        &self,
        table: &Table,
        row_description: &str,
        options: &InteractionOptions,
    ) -> Result<TangibleResponse<Table>, TangibleError> {
        let prompt = prompt::added_row_prompt(table, row_description);
        self.expect_table(&prompt, &table.columns, options).await
    }

    /// Only the `count` new rows; the given rows are not repeated.
    ///
    /// # Errors
    ///
    /// Returns [`TangibleError`] if the interaction aborts.
    pub async fn expect_additional_rows(
        &self,
        table: &Table,
        row_description: &str,
        count: usize,
        options: &InteractionOptions,
    ) -> Result<TangibleResponse<Table>, TangibleError> {
        let prompt = prompt::additional_rows_prompt(table, row_description, count);
        self.expect_table(&prompt, &table.columns, options).await
    }
}

// =============================================================================
// HELPERS
// =============================================================================

fn json_response<T: DeserializeOwned>(interaction: Interaction, reason: &str) -> TangibleResponse<T> {
    match parse::parse_json(&interaction.reply) {
        Ok(value) => interaction.success(value),
        Err(e) => interaction.failure(format!("{reason}: {e}")),
    }
}

fn option_response<T>(
    interaction: Interaction,
    parser: impl FnOnce(&str) -> Option<T>,
    reason: &str,
) -> TangibleOptionResponse<T> {
    if parse::i_dont_know(&interaction.reply) {
        return interaction.success(None);
    }
    let parsed = parser(&interaction.reply).map(Some);
    interaction.respond(parsed, reason)
}

fn example_json<R: Serialize>(example: &R) -> Result<String, TangibleError> {
    serde_json::to_string_pretty(example).map_err(TangibleError::InvalidExample)
}

fn groups_example() -> String {
    let example = [
        ItemGroup { name: "group1".into(), items: vec!["item1".into(), "item2".into()] },
        ItemGroup { name: "group2".into(), items: vec!["item3".into()] },
    ];
    serde_json::to_string_pretty(&example).unwrap_or_default()
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
