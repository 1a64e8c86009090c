//! Column-name derivation for fields without an explicit `name`.

/// Convert a field identifier to snake_case.
///
/// An `_` is inserted before every non-initial uppercase letter that follows a lowercase letter
/// or precedes one, so acronym runs stay together (`HTTPServer` becomes `http_server`, `ID`
/// becomes `id`). Identifiers already in snake_case are returned unchanged.
pub fn to_snake_case(ident: &str) -> String {
    let chars: Vec<char> = ident.chars().collect();
    let mut out = String::with_capacity(ident.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev != '_' && (prev.is_lowercase() || next_is_lower) {
                out.push('_');
            }
        }
        out.extend(c.to_lowercase());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::to_snake_case;

    #[test]
    fn camel_and_pascal_case() {
        assert_eq!(to_snake_case("UserName"), "user_name");
        assert_eq!(to_snake_case("firstName"), "first_name");
        assert_eq!(to_snake_case("ConfirmPassword"), "confirm_password");
    }

    #[test]
    fn acronym_runs() {
        assert_eq!(to_snake_case("ID"), "id");
        assert_eq!(to_snake_case("HTTPServer"), "http_server");
        assert_eq!(to_snake_case("UserID"), "user_id");
        assert_eq!(to_snake_case("APIKeyV2"), "api_key_v2");
    }

    #[test]
    fn snake_case_is_untouched() {
        assert_eq!(to_snake_case("user_name"), "user_name");
        assert_eq!(to_snake_case("data"), "data");
        assert_eq!(to_snake_case("Address_Line"), "address_line");
    }

    #[test]
    fn digits_before_words() {
        assert_eq!(to_snake_case("Field1Name"), "field1_name");
    }
}
