use crate::Type;

/// Class names compare case-insensitively and ignore a leading `\`.
pub fn class_names_equal(a: &str, b: &str) -> bool {
    a.trim_start_matches('\\')
        .eq_ignore_ascii_case(b.trim_start_matches('\\'))
}

/// Semantic type equality.
///
/// Unions are equal when each member of one has an equal member in the other,
/// regardless of order.
pub fn are_types_equal(a: &Type, b: &Type) -> bool {
    match (a, b) {
        (Type::Object(x), Type::Object(y)) => class_names_equal(x, y),
        (
            Type::GenericObject {
                class_name: x,
                types: xs,
            },
            Type::GenericObject {
                class_name: y,
                types: ys,
            },
        ) => class_names_equal(x, y) && lists_equal(xs, ys),
        (Type::ConstantString(x), Type::ConstantString(y)) => x == y,
        (Type::ClassString(None), Type::ClassString(None)) => true,
        (Type::ClassString(Some(x)), Type::ClassString(Some(y))) => are_types_equal(x, y),
        (Type::Static(x), Type::Static(y)) => class_names_equal(x, y),
        (Type::Array(x), Type::Array(y)) => are_types_equal(x, y),
        (Type::Union(xs), Type::Union(ys)) => {
            xs.iter().all(|x| ys.iter().any(|y| are_types_equal(x, y)))
                && ys.iter().all(|y| xs.iter().any(|x| are_types_equal(x, y)))
        }
        _ => a == b,
    }
}

fn lists_equal(xs: &[Type], ys: &[Type]) -> bool {
    xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| are_types_equal(x, y))
}
