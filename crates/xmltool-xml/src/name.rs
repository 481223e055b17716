//! XML name encoding.

/// Prefix bound to the export namespace; the only prefix a name may keep.
const PC_PREFIX: &str = "pc:";

/// Encode a string as a valid XML element or attribute name.
///
/// Invalid characters are replaced with underscores. A name that does not
/// start with a letter or underscore gets an underscore prefix. Colons are
/// replaced too, except in a leading `pc:` prefix, so `pc:children` passes
/// through unchanged while `a:b` becomes `a_b`.
pub fn encode_xml_name(name: &str) -> String {
    let mut result = String::with_capacity(name.len() + 1);

    let local = match name.strip_prefix(PC_PREFIX) {
        Some(local) if !local.is_empty() => {
            result.push_str(PC_PREFIX);
            local
        }
        _ => name,
    };

    for (i, c) in local.chars().enumerate() {
        if i == 0 {
            if c.is_alphabetic() || c == '_' {
                result.push(c);
            } else {
                result.push('_');
                if c.is_alphanumeric() {
                    result.push(c);
                }
            }
        } else if c.is_alphanumeric() || matches!(c, '_' | '-' | '.') {
            result.push(c);
        } else {
            result.push('_');
        }
    }

    if result.is_empty() {
        result.push_str("Element");
    }

    result
}
