use async_graphql::dynamic::TypeRef;
use async_graphql::indexmap;
use async_graphql::Value as GqlValue;
use async_graphql::{Name, Number};
use auth_forge_core::StrategyArgs;

/// Scalar used for item fields whose shape the binder does not know.
pub const JSON_SCALAR: &str = "JSON";

/// Parse an SDL type reference (`String`, `String!`, `[ID!]`, `[ID!]!`) into a `TypeRef`.
pub fn parse_type_ref(sdl: &str) -> Result<TypeRef, String> {
    let sdl = sdl.trim();
    let (inner, outer_nn) = match sdl.strip_suffix('!') {
        Some(rest) => (rest.trim_end(), true),
        None => (sdl, false),
    };

    if let Some(list) = inner.strip_prefix('[') {
        let Some(element) = list.strip_suffix(']') else {
            return Err(format!("unbalanced list type reference '{sdl}'"));
        };
        let element = element.trim();
        let (name, element_nn) = match element.strip_suffix('!') {
            Some(rest) => (rest.trim_end(), true),
            None => (element, false),
        };
        check_named(name, sdl)?;
        return Ok(match (element_nn, outer_nn) {
            (false, false) => TypeRef::named_list(name),
            (true, false) => TypeRef::named_nn_list(name),
            (false, true) => TypeRef::named_list_nn(name),
            (true, true) => TypeRef::named_nn_list_nn(name),
        });
    }

    check_named(inner, sdl)?;
    Ok(if outer_nn {
        TypeRef::named_nn(inner)
    } else {
        TypeRef::named(inner)
    })
}

fn check_named(name: &str, sdl: &str) -> Result<(), String> {
    if auth_forge_core::types::is_graphql_name(name) {
        Ok(())
    } else {
        Err(format!("invalid type reference '{sdl}'"))
    }
}

/// Convert a JSON value to a GraphQL output value.
pub fn json_to_gql_value(v: &serde_json::Value) -> GqlValue {
    match v {
        serde_json::Value::Null => GqlValue::Null,
        serde_json::Value::Bool(b) => GqlValue::Boolean(*b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                GqlValue::Number(Number::from(i))
            } else if let Some(f) = n.as_f64() {
                Number::from_f64(f)
                    .map(GqlValue::Number)
                    .unwrap_or(GqlValue::Null)
            } else {
                GqlValue::Null
            }
        }
        serde_json::Value::String(s) => GqlValue::String(s.clone()),
        serde_json::Value::Array(arr) => {
            GqlValue::List(arr.iter().map(json_to_gql_value).collect())
        }
        serde_json::Value::Object(map) => {
            let obj = map
                .iter()
                .map(|(k, v)| (Name::new(k), json_to_gql_value(v)))
                .collect();
            GqlValue::Object(obj)
        }
    }
}

/// Convert a GraphQL input value to JSON.
pub fn gql_value_to_json(v: &GqlValue) -> serde_json::Value {
    match v {
        GqlValue::Null => serde_json::Value::Null,
        GqlValue::Boolean(b) => serde_json::Value::Bool(*b),
        // async_graphql::Number wraps serde_json::Number
        GqlValue::Number(n) => serde_json::Value::Number(n.clone()),
        GqlValue::String(s) => serde_json::Value::String(s.clone()),
        GqlValue::Enum(name) => serde_json::Value::String(name.to_string()),
        GqlValue::List(arr) => serde_json::Value::Array(arr.iter().map(gql_value_to_json).collect()),
        GqlValue::Object(map) => {
            let obj: serde_json::Map<String, serde_json::Value> = map
                .iter()
                .map(|(k, v)| (k.to_string(), gql_value_to_json(v)))
                .collect();
            serde_json::Value::Object(obj)
        }
        _ => serde_json::Value::Null,
    }
}

/// Collect resolver arguments into the map handed to a strategy.
pub fn arguments_to_strategy_args(args: &indexmap::IndexMap<Name, GqlValue>) -> StrategyArgs {
    args.iter()
        .map(|(name, value)| (name.to_string(), gql_value_to_json(value)))
        .collect()
}
