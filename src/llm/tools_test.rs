use serde::Deserialize;

use super::*;

#[derive(Deserialize)]
struct AddInput {
    a: i64,
    b: i64,
}

fn add_function() -> FunctionCall {
    FunctionCall::new(
        "add",
        "Add two integers",
        vec![Param::Integer { name: "a".into() }, Param::Integer { name: "b".into() }],
        typed_function(|input: AddInput| async move { Ok::<_, BoxError>(input.a + input.b) }),
    )
}

#[test]
fn tool_declaration_lists_params() {
    let tool = add_function().to_tool();
    assert_eq!(tool.name, "add");
    assert_eq!(tool.description.as_deref(), Some("Add two integers"));
    assert_eq!(tool.parameters.schema_type, "object");
    assert_eq!(tool.parameters.properties.len(), 2);
    assert_eq!(tool.parameters.properties["a"].property_type, PropertyType::Integer);
    assert_eq!(tool.parameters.properties["a"].description, "a");
}

#[test]
fn enum_param_becomes_string_with_allowed_values() {
    let param = Param::Enum { name: "unit".into(), options: vec!["celsius".into(), "fahrenheit".into()] };
    let prop = param.to_property();
    assert_eq!(prop.property_type, PropertyType::String);
    assert_eq!(prop.allowed, Some(vec!["celsius".to_string(), "fahrenheit".to_string()]));
}

#[test]
fn param_types_map_to_property_types() {
    assert_eq!(Param::String { name: "s".into() }.property_type(), PropertyType::String);
    assert_eq!(Param::Boolean { name: "b".into() }.property_type(), PropertyType::Boolean);
    assert_eq!(Param::Double { name: "d".into() }.property_type(), PropertyType::Double);
}

#[test]
fn function_call_tools_preserves_order() {
    let echo = FunctionCall::new(
        "echo",
        "Echo text",
        vec![Param::String { name: "text".into() }],
        typed_function(|input: serde_json::Value| async move { Ok::<_, BoxError>(input) }),
    );
    let tools = function_call_tools(&[add_function(), echo]);
    let names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["add", "echo"]);
}

#[tokio::test]
async fn typed_function_decodes_and_serializes() {
    let result = add_function()
        .function
        .invoke("{\"a\":2,\"b\":3}")
        .await
        .unwrap();
    assert_eq!(result, "5");
}

#[tokio::test]
async fn typed_function_rejects_bad_arguments() {
    let err = add_function()
        .function
        .invoke("{\"a\":\"two\"}")
        .await
        .unwrap_err();
    assert!(matches!(err, ToolError::Arguments(_)));
}

#[tokio::test]
async fn typed_function_surfaces_host_failure() {
    let failing = typed_function(|_: serde_json::Value| async move { Err::<u8, BoxError>("offline".into()) });
    let err = failing.invoke("{}").await.unwrap_err();
    assert!(matches!(err, ToolError::Failed(_)));
    assert!(err.to_string().contains("offline"));
}

#[test]
fn debug_hides_function_body() {
    let rendered = format!("{:?}", add_function());
    assert!(rendered.contains("add"));
    assert!(rendered.contains(".."));
}
