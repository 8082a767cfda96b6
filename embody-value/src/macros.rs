/// Builds a [`Value`](crate::Value) from JSON-like syntax.
///
/// ```
/// use embody_value::value;
///
/// let v = value!({ "name": "${user}", "ports": [80, 443], "tls": true, "extra": null });
/// assert_eq!(v.get("tls").and_then(|t| t.as_bool()), Some(true));
/// ```
///
/// Elements are single token trees, so negative numbers and other compound
/// expressions need parentheses: `value!([(-1), (1 + 1)])`.
#[macro_export]
macro_rules! value {
    (null) => {
        $crate::Value::Null
    };
    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::Array(::std::vec![ $( $crate::value!($elem) ),* ])
    };
    ({ $($key:literal : $val:tt),* $(,)? }) => {{
        #[allow(unused_mut)]
        let mut obj = $crate::VObject::new();
        $( obj.insert($key, $crate::value!($val)); )*
        $crate::Value::Object(obj)
    }};
    ($other:expr) => {
        $crate::Value::from($other)
    };
}
