//! `{{name}}` placeholder substitution for outreach subjects and bodies.
//!
//! Values are inserted as-is (no HTML escaping). Placeholders whose name is
//! not in the variable map are left untouched.

use std::collections::HashMap;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Replace every `{{name}}` whose `name` is present in `variables`.
///
/// Single pass over the template: substituted values are never re-scanned,
/// so the result does not depend on the map's iteration order.
pub fn render(template: &str, variables: &HashMap<&str, &str>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find(OPEN) {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + OPEN.len()..];

        let Some(end) = after_open.find(CLOSE) else {
            out.push_str(&rest[start..]);
            return out;
        };

        let name = &after_open[..end];
        match variables.get(name) {
            Some(value) => {
                out.push_str(value);
                rest = &after_open[end + CLOSE.len()..];
            }
            None => {
                // Not a known key: keep one brace and rescan from the next
                // character so an inner `{{key}}` still gets its own match.
                out.push('{');
                rest = &rest[start + 1..];
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitutes_all_known_variables() {
        let vars = HashMap::from([("name", "Avery"), ("url", "http://x")]);
        assert_eq!(
            render("Hello {{name}}, visit {{url}}", &vars),
            "Hello Avery, visit http://x"
        );
    }

    #[test]
    fn test_insertion_order_does_not_matter() {
        let mut forward = HashMap::new();
        forward.insert("name", "Avery");
        forward.insert("url", "http://x");
        let mut backward = HashMap::new();
        backward.insert("url", "http://x");
        backward.insert("name", "Avery");

        let template = "Hello {{name}}, visit {{url}}";
        assert_eq!(render(template, &forward), render(template, &backward));
    }

    #[test]
    fn test_missing_variable_left_verbatim() {
        let vars = HashMap::from([("name", "Avery")]);
        assert_eq!(
            render("Hello {{name}}, visit {{url}}", &vars),
            "Hello Avery, visit {{url}}"
        );
    }

    #[test]
    fn test_repeated_placeholders() {
        let vars = HashMap::from([("n", "1")]);
        assert_eq!(render("{{n}}+{{n}}={{n}}{{n}}", &vars), "1+1=11");
    }

    #[test]
    fn test_values_are_not_rescanned() {
        let vars = HashMap::from([("a", "{{b}}"), ("b", "boom")]);
        assert_eq!(render("{{a}}", &vars), "{{b}}");
    }

    #[test]
    fn test_rendering_is_idempotent_when_complete() {
        let vars = HashMap::from([("name", "Avery")]);
        let once = render("<p>Hi {{name}}</p>", &vars);
        assert_eq!(render(&once, &vars), once);
    }

    #[test]
    fn test_unterminated_and_plain_text() {
        let vars = HashMap::from([("name", "Avery")]);
        assert_eq!(render("no placeholders", &vars), "no placeholders");
        assert_eq!(render("Hi {{name", &vars), "Hi {{name");
        assert_eq!(render("", &vars), "");
    }

    #[test]
    fn test_triple_braces_wrap_the_value() {
        let vars = HashMap::from([("name", "Avery")]);
        assert_eq!(render("{{{name}}}", &vars), "{Avery}");
    }

    #[test]
    fn test_stray_open_braces_before_placeholder() {
        let vars = HashMap::from([("name", "Avery")]);
        assert_eq!(render("a {{ b {{name}}", &vars), "a {{ b Avery");
        assert_eq!(render("{{x}} {{name}} {{x}}", &vars), "{{x}} Avery {{x}}");
    }
}
