// params
/// Build a positional argument list, converting each expression into a `Value`.
#[macro_export]
macro_rules! params {
    () => {
        ::std::vec::Vec::<$crate::value::Value>::new()
    };
    ( $( $arg:expr ),+ $(,)? ) => {
        ::std::vec![ $( $crate::value::Value::from($arg) ),+ ]
    };
}
