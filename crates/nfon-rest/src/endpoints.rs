//! Endpoint template table and placeholder expansion.
//!
//! Templates use `{name}` placeholders; `{{` and `}}` stand for literal
//! braces. Values are inserted verbatim so the expanded path is exactly the
//! path that gets signed.

use crate::error::NfonError;
use std::collections::HashMap;

/// Version of the built-in endpoint definitions, compared against the
/// server's `version` endpoint by the self-check.
pub const ENDPOINTS_VERSION: &str = "1.0";

/// Key of the version endpoint.
pub const VERSION_ENDPOINT: &str = "version";

/// Built-in service portal endpoints.
const BUILTIN_ENDPOINTS: &[(&str, &str)] = &[
    ("version", "/api/version"),
    ("customers", "/api/customers"),
    ("customer", "/api/customers/{identifier}"),
    (
        "system-integrator-customers",
        "/api/system-integrators/{systemIntegratorId}/customers",
    ),
    (
        "customer-phone-extensions",
        "/api/customers/{identifier}/targets/phone-extensions",
    ),
    (
        "customer-phone-extension",
        "/api/customers/{identifier}/targets/phone-extensions/{extensionNumber}",
    ),
    (
        "customer-queues",
        "/api/customers/{identifier}/targets/queues",
    ),
    (
        "customer-queue",
        "/api/customers/{identifier}/targets/queues/{queueNumber}",
    ),
    (
        "customer-conference-rooms",
        "/api/customers/{identifier}/targets/conference-rooms",
    ),
    (
        "customer-skill-services",
        "/api/customers/{identifier}/targets/skill-services",
    ),
    (
        "customer-inbound-trunk-numbers",
        "/api/customers/{identifier}/inbound-trunk-numbers",
    ),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment<'a> {
    Literal(&'a str),
    Placeholder(&'a str),
}

fn parse(template: &str) -> Result<Vec<Segment<'_>>, &'static str> {
    let mut segments = Vec::new();
    let mut rest = template;

    while !rest.is_empty() {
        if let Some(tail) = rest.strip_prefix("{{") {
            segments.push(Segment::Literal("{"));
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix("}}") {
            segments.push(Segment::Literal("}"));
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix('{') {
            let end = tail.find('}').ok_or("unclosed '{'")?;
            let name = &tail[..end];
            if name.is_empty() {
                return Err("empty placeholder name");
            }
            if name.contains('{') {
                return Err("nested '{'");
            }
            segments.push(Segment::Placeholder(name));
            rest = &tail[end + 1..];
        } else if rest.starts_with('}') {
            return Err("unmatched '}'");
        } else {
            let end = rest.find(|c: char| c == '{' || c == '}').unwrap_or(rest.len());
            segments.push(Segment::Literal(&rest[..end]));
            rest = &rest[end..];
        }
    }

    Ok(segments)
}

/// Mapping from logical endpoint keys to path templates.
///
/// Read-only once built; share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct EndpointTable {
    version: String,
    templates: HashMap<String, String>,
}

impl Default for EndpointTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl EndpointTable {
    /// Create a table from `(key, template)` pairs.
    pub fn new<K, V>(
        version: impl Into<String>,
        templates: impl IntoIterator<Item = (K, V)>,
    ) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            version: version.into(),
            templates: templates
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// The built-in service portal table.
    pub fn builtin() -> Self {
        Self::new(ENDPOINTS_VERSION, BUILTIN_ENDPOINTS.iter().copied())
    }

    /// Version of these endpoint definitions.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// All endpoint keys, sorted.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.templates.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Raw template for `key`.
    pub fn template(&self, key: &str) -> Result<&str, NfonError> {
        self.templates
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| NfonError::EndpointNotFound(key.to_string()))
    }

    /// Placeholder names of `key`'s template, in order of first appearance.
    pub fn variables(&self, key: &str) -> Result<Vec<&str>, NfonError> {
        let template = self.template(key)?;
        let segments = self.parse_template(key, template)?;
        Ok(placeholder_names(&segments))
    }

    /// Expand `key`'s template with `args`.
    ///
    /// Extra arguments are ignored. A missing one fails with
    /// [`NfonError::MissingEndpointVariable`] listing every placeholder.
    pub fn resolve(&self, key: &str, args: &[(&str, &str)]) -> Result<String, NfonError> {
        let template = self.template(key)?;
        let segments = self.parse_template(key, template)?;

        let mut path = String::with_capacity(template.len());
        for segment in &segments {
            match segment {
                Segment::Literal(text) => path.push_str(text),
                Segment::Placeholder(name) => {
                    let value = args
                        .iter()
                        .find(|(arg, _)| arg == name)
                        .map(|(_, value)| *value)
                        .ok_or_else(|| NfonError::MissingEndpointVariable {
                            key: key.to_string(),
                            missing: name.to_string(),
                            required: placeholder_names(&segments)
                                .into_iter()
                                .map(str::to_string)
                                .collect(),
                            template: template.to_string(),
                        })?;
                    path.push_str(value);
                }
            }
        }

        Ok(path)
    }

    fn parse_template<'t>(
        &self,
        key: &str,
        template: &'t str,
    ) -> Result<Vec<Segment<'t>>, NfonError> {
        parse(template).map_err(|reason| NfonError::InvalidEndpointTemplate {
            key: key.to_string(),
            template: template.to_string(),
            reason,
        })
    }
}

fn placeholder_names<'a>(segments: &[Segment<'a>]) -> Vec<&'a str> {
    let mut names: Vec<&str> = Vec::new();
    for segment in segments {
        if let Segment::Placeholder(name) = segment {
            if !names.contains(name) {
                names.push(*name);
            }
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> EndpointTable {
        EndpointTable::new(
            "test",
            [
                ("version", "/api/version"),
                ("customers/{id}", "/api/customers/{id}"),
                ("pair", "/api/{a}/items/{b}/{a}"),
                ("braces", "/api/{{literal}}/{id}"),
                ("unclosed", "/api/{id"),
                ("stray", "/api/id}"),
                ("empty", "/api/{}"),
            ],
        )
    }

    #[test]
    fn test_resolve_without_placeholders() {
        assert_eq!(table().resolve("version", &[]).unwrap(), "/api/version");
    }

    #[test]
    fn test_resolve_substitutes_all() {
        let path = table()
            .resolve("pair", &[("a", "K1"), ("b", "42"), ("unused", "x")])
            .unwrap();
        assert_eq!(path, "/api/K1/items/42/K1");
    }

    #[test]
    fn test_resolve_unknown_key() {
        let err = table().resolve("nonexistent", &[]).unwrap_err();
        assert!(matches!(err, NfonError::EndpointNotFound(key) if key == "nonexistent"));
    }

    #[test]
    fn test_resolve_missing_variable() {
        match table().resolve("customers/{id}", &[]).unwrap_err() {
            NfonError::MissingEndpointVariable {
                key,
                missing,
                required,
                template,
            } => {
                assert_eq!(key, "customers/{id}");
                assert_eq!(missing, "id");
                assert_eq!(required, vec!["id"]);
                assert_eq!(template, "/api/customers/{id}");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_missing_variable_lists_every_placeholder() {
        match table().resolve("pair", &[("a", "K1")]).unwrap_err() {
            NfonError::MissingEndpointVariable {
                missing, required, ..
            } => {
                assert_eq!(missing, "b");
                assert_eq!(required, vec!["a", "b"]);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_escaped_braces() {
        assert_eq!(
            table().resolve("braces", &[("id", "7")]).unwrap(),
            "/api/{literal}/7"
        );
        assert_eq!(table().variables("braces").unwrap(), vec!["id"]);
    }

    #[test]
    fn test_malformed_templates() {
        for key in ["unclosed", "stray", "empty"] {
            let err = table().resolve(key, &[("id", "1")]).unwrap_err();
            assert!(
                matches!(err, NfonError::InvalidEndpointTemplate { .. }),
                "{key}: {err:?}"
            );
        }
    }

    #[test]
    fn test_variables() {
        assert_eq!(table().variables("pair").unwrap(), vec!["a", "b"]);
        assert!(table().variables("version").unwrap().is_empty());
        assert!(matches!(
            table().variables("nope"),
            Err(NfonError::EndpointNotFound(_))
        ));
    }

    #[test]
    fn test_builtin_templates_are_well_formed() {
        let table = EndpointTable::builtin();
        assert_eq!(table.version(), ENDPOINTS_VERSION);
        assert!(table.keys().contains(&VERSION_ENDPOINT));

        for key in table.keys() {
            table.variables(key).unwrap();
        }
    }

    #[test]
    fn test_builtin_customer_endpoints() {
        let table = EndpointTable::builtin();

        assert_eq!(
            table.resolve("customer", &[("identifier", "K1234")]).unwrap(),
            "/api/customers/K1234"
        );
        assert_eq!(
            table
                .resolve(
                    "system-integrator-customers",
                    &[("systemIntegratorId", "S9876")]
                )
                .unwrap(),
            "/api/system-integrators/S9876/customers"
        );
        assert_eq!(
            table.variables("customer-phone-extension").unwrap(),
            vec!["identifier", "extensionNumber"]
        );
    }
}
