//! Prompt construction: response-format descriptions, reasoning strategy
//! wrapping, and the list/table prompts the typed methods send.

use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::table::{Column, Table, describe_column, render_table};

/// How many round trips an interaction spends before the final answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReasoningStrategy {
    /// One request with the response format inline.
    #[default]
    Simple,
    /// Reason first, then a second turn demands the formatted answer.
    ThinkStepByStep,
    /// Enumerate alternatives, then a second turn picks the best one.
    SuggestMultipleAndPickOne,
}

impl ReasoningStrategy {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::ThinkStepByStep => "step-by-step",
            Self::SuggestMultipleAndPickOne => "pick-one",
        }
    }

    /// Number of underlying chat interactions this strategy performs.
    #[must_use]
    pub fn turns(self) -> usize {
        match self {
            Self::Simple => 1,
            Self::ThinkStepByStep | Self::SuggestMultipleAndPickOne => 2,
        }
    }
}

impl Display for ReasoningStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReasoningStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "simple" => Ok(Self::Simple),
            "step-by-step" | "think-step-by-step" | "thinkstepbystep" => Ok(Self::ThinkStepByStep),
            "pick-one" | "suggest-multiple-and-pick-one" | "suggestmultipleandpickone" => {
                Ok(Self::SuggestMultipleAndPickOne)
            }
            other => Err(format!("unknown reasoning strategy: {other} (expected simple, step-by-step or pick-one)")),
        }
    }
}

// =============================================================================
// REASONING WRAPPERS
// =============================================================================

/// First user message of an interaction.
#[must_use]
pub fn initial_prompt(strategy: ReasoningStrategy, prompt: &str, format: Option<&str>) -> String {
    match strategy {
        ReasoningStrategy::Simple => match format {
            Some(format) => format!("{prompt}\n\n{format}"),
            None => prompt.to_string(),
        },
        ReasoningStrategy::ThinkStepByStep => format!("{prompt}\n\nLet's think step by step"),
        ReasoningStrategy::SuggestMultipleAndPickOne => {
            format!("{prompt}\n\nGive me some alternative answers to this that make sense. Enumerate them.")
        }
    }
}

/// Second-turn message demanding the final answer, if the strategy has one.
#[must_use]
pub fn follow_up_prompt(strategy: ReasoningStrategy, format: Option<&str>) -> Option<String> {
    let lead = match strategy {
        ReasoningStrategy::Simple => return None,
        ReasoningStrategy::ThinkStepByStep => "Give me an answer.",
        ReasoningStrategy::SuggestMultipleAndPickOne => "Pick the best answer.",
    };
    Some(match format {
        Some(format) => format!("{lead}\n\n{format}"),
        None => lead.to_string(),
    })
}

/// Instruction used to re-issue a request on top of a prior attempt's history.
#[must_use]
pub fn adjustment_prompt(instruction: &str) -> String {
    format!("I want you to adjust the previous attempt. Please also consider: {instruction}")
}

// =============================================================================
// RESPONSE FORMATS
// =============================================================================

pub const I_DONT_KNOW_FORMAT: &str = "If you don't know the answer, simply reply with \"I don't know\", nothing else.";
pub const BOOLEAN_FORMAT: &str = "I only want a yes or no answer, nothing else. Reply with either \"yes\" or \"no\"";
pub const NUMBER_FORMAT: &str = "I only want a number (all digits) as an answer, nothing else.";
pub const ITEMS_FORMAT: &str = "I only want a list of items. Each item on its own line. Nothing else.";
pub const SORTED_FORMAT: &str = "The response must be a sorted JSON array of strings (items), nothing else";
pub const FILTERED_FORMAT: &str = "The response must be a filtered JSON array of strings (items), nothing else";

/// Prefix `format` with the "I don't know" escape hatch of option methods.
#[must_use]
pub fn option_format(format: &str) -> String {
    format!("{I_DONT_KNOW_FORMAT}\n{format}")
}

#[must_use]
pub fn json_format(example: &str) -> String {
    format!("The response must be valid JSON and only JSON, nothing else\n\nExample:\n{example}")
}

#[must_use]
pub fn enum_case_format(options: &str) -> String {
    format!("I want you to respond with one of the following values, nothing else:\n{options}")
}

#[must_use]
pub fn enum_cases_format(options: &str) -> String {
    format!(
        "Given the following options:\n{options}\n\
         I want you to respond with those that apply. If none of them apply, just say \"None\".\n\
         I want a list of options on a single line, separated by comma, and nothing else in the response."
    )
}

#[must_use]
pub fn extended_format(count: usize) -> String {
    let lead = if count == 1 { "The added item must be last." } else { "The added items must be last." };
    format!("{lead} The response must be a valid JSON array of strings (items), nothing else")
}

#[must_use]
pub fn table_format(columns: &[Column]) -> String {
    format!(
        "The response must be CSV format (semicolon separated) with columns: {}\n\
         No header row, just data\n\n\
         Columns:\n{}",
        column_names(columns),
        columns
            .iter()
            .map(describe_column)
            .collect::<Vec<_>>()
            .join("\n"),
    )
}

/// Comma-separated display form of enumeration options.
pub fn options_description<T: Display>(options: &[T]) -> String {
    options
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn column_names(columns: &[Column]) -> String {
    columns
        .iter()
        .map(Column::name)
        .collect::<Vec<_>>()
        .join(";")
}

// =============================================================================
// LIST PROMPTS
// =============================================================================

#[must_use]
pub fn sort_prompt(items: &[String], criteria: Option<&str>) -> String {
    let items = items.join("\n");
    match criteria {
        Some(criteria) => format!(
            "I want you to sort a list of items based on the following criteria: {criteria}\n\n\
             Here are the items to be sorted\n{items}"
        ),
        None => format!("I want you to sort the following items in the most obvious way:\n{items}"),
    }
}

#[must_use]
pub fn extend_prompt(items: &[String], count: usize) -> String {
    let items = items.join("\n");
    if count == 1 {
        format!("Extend this list with the most obvious item: {items}")
    } else {
        format!("Extend this list with the most obvious {count} items: {items}")
    }
}

#[must_use]
pub fn filter_prompt(items: &[String], predicate: &str) -> String {
    format!(
        "I have a list of items that I need to filter.\n\
         Only include the items that adhere the following is true: {predicate}\n\n\
         The items are:\n{}",
        items.join("\n")
    )
}

#[must_use]
pub fn groups_prompt(items: &[String], group_names: Option<&[String]>, criteria: Option<&str>) -> String {
    let criteria = criteria
        .map(|c| format!("Items should be grouped by the following criteria: {c}"))
        .unwrap_or_default();
    let items = format!("Here are the items that should be distributed in the right groups:\n\n{}", items.join("\n"));
    match group_names {
        Some(names) => format!(
            "I want you to put some items into different groups.\n\n\
             These groups are: {}\n{criteria}\n\n{items}",
            names.join(", ")
        ),
        None => format!(
            "I want you to put some items into different groups.\n\
             Make up some sensible names for these groups.\n\n{criteria}\n\n{items}"
        ),
    }
}

// =============================================================================
// TABLE PROMPTS
// =============================================================================

#[must_use]
pub fn added_column_prompt(table: &Table, column: &Column, intention: &str) -> String {
    format!(
        "{}\nExpand this table with another column:\n{}\n\n{intention}",
        render_table(table),
        describe_column(column)
    )
}

#[must_use]
pub fn added_row_prompt(table: &Table, row_description: &str) -> String {
    format!(
        "{}\nExpand this table with another row (as the last row in the table):\n{row_description}",
        render_table(table)
    )
}

#[must_use]
pub fn additional_rows_prompt(table: &Table, row_description: &str, count: usize) -> String {
    format!(
        "{}\nI need {count} more rows in this table (do not include the given rows in the response):\n{row_description}",
        render_table(table)
    )
}

#[cfg(test)]
#[path = "prompt_test.rs"]
mod tests;
