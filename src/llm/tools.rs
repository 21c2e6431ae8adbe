//! Host functions the model may call, and their tool declarations.
//!
//! A [`FunctionCall`] pairs a declaration (name, description, params) with an
//! async host function. The typed client advertises the declarations via
//! [`function_call_tools`] and dispatches model-issued calls by name.

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::types::{Parameters, Property, PropertyType, Tool};

/// Boxed error returned by host functions.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised while running a host function for a tool call.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// The model's argument payload did not decode as the function's input type.
    #[error("invalid arguments: {0}")]
    Arguments(#[source] serde_json::Error),

    /// The host function itself failed.
    #[error("function failed: {0}")]
    Failed(#[source] BoxError),

    /// The function's result could not be serialized.
    #[error("result serialization failed: {0}")]
    Result(#[source] serde_json::Error),
}

// =============================================================================
// DECLARATIONS
// =============================================================================

/// A declared function parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    Integer { name: String },
    String { name: String },
    Enum { name: String, options: Vec<String> },
    Boolean { name: String },
    Double { name: String },
}

impl Param {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Integer { name }
            | Self::String { name }
            | Self::Enum { name, .. }
            | Self::Boolean { name }
            | Self::Double { name } => name,
        }
    }

    #[must_use]
    pub fn property_type(&self) -> PropertyType {
        match self {
            Self::Integer { .. } => PropertyType::Integer,
            Self::String { .. } | Self::Enum { .. } => PropertyType::String,
            Self::Boolean { .. } => PropertyType::Boolean,
            Self::Double { .. } => PropertyType::Double,
        }
    }

    fn to_property(&self) -> Property {
        let allowed = match self {
            Self::Enum { options, .. } => Some(options.clone()),
            _ => None,
        };
        Property { property_type: self.property_type(), description: self.name().to_string(), allowed }
    }
}

/// An async host function invoked with the model's raw JSON argument text.
#[async_trait::async_trait]
pub trait HostFunction: Send + Sync {
    /// Run the function and return its serialized result.
    ///
    /// # Errors
    ///
    /// Returns a [`ToolError`] if the arguments do not decode, the function
    /// fails, or its result cannot be serialized.
    async fn invoke(&self, arguments: &str) -> Result<String, ToolError>;
}

/// A function declaration together with the host function backing it.
#[derive(Clone)]
pub struct FunctionCall {
    pub name: String,
    pub description: String,
    pub params: Vec<Param>,
    pub function: Arc<dyn HostFunction>,
}

impl FunctionCall {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        params: Vec<Param>,
        function: impl HostFunction + 'static,
    ) -> Self {
        Self { name: name.into(), description: description.into(), params, function: Arc::new(function) }
    }

    #[must_use]
    pub fn to_tool(&self) -> Tool {
        let properties: BTreeMap<String, Property> = self
            .params
            .iter()
            .map(|p| (p.name().to_string(), p.to_property()))
            .collect();
        Tool {
            name: self.name.clone(),
            description: Some(self.description.clone()),
            parameters: Parameters::object(properties),
        }
    }
}

impl fmt::Debug for FunctionCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionCall")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Tool declarations advertised to the model for the given functions.
#[must_use]
pub fn function_call_tools(functions: &[FunctionCall]) -> Vec<Tool> {
    functions.iter().map(FunctionCall::to_tool).collect()
}

// =============================================================================
// TYPED ADAPTER
// =============================================================================

/// Host function built from an async closure over typed input and output.
///
/// Arguments are decoded with serde only; no schema validation is performed
/// against the declared params.
pub struct TypedFunction<I, O, F> {
    f: F,
    _io: PhantomData<fn(I) -> O>,
}

/// Adapt `f` into a [`HostFunction`] that decodes `I` and serializes `O`.
pub fn typed_function<I, O, F, Fut>(f: F) -> TypedFunction<I, O, F>
where
    I: DeserializeOwned + Send + 'static,
    O: Serialize + Send + 'static,
    F: Fn(I) -> Fut + Send + Sync,
    Fut: Future<Output = Result<O, BoxError>> + Send,
{
    TypedFunction { f, _io: PhantomData }
}

#[async_trait::async_trait]
impl<I, O, F, Fut> HostFunction for TypedFunction<I, O, F>
where
    I: DeserializeOwned + Send + 'static,
    O: Serialize + Send + 'static,
    F: Fn(I) -> Fut + Send + Sync,
    Fut: Future<Output = Result<O, BoxError>> + Send,
{
    async fn invoke(&self, arguments: &str) -> Result<String, ToolError> {
        let input: I = serde_json::from_str(arguments).map_err(ToolError::Arguments)?;
        let output = (self.f)(input).await.map_err(ToolError::Failed)?;
        serde_json::to_string(&output).map_err(ToolError::Result)
    }
}

#[cfg(test)]
#[path = "tools_test.rs"]
mod tests;
