use model::core::value::Value;
use tiberius::Query;

/// Binds values to `@P1..@Pn` in order.
pub fn bind_values(query: &mut Query<'_>, params: Vec<Value>) {
    for value in params {
        match value {
            Value::Int32(v) => query.bind(v),
            Value::Int(v) => query.bind(v),
            Value::Float(v) => query.bind(v),
            Value::Decimal(v) => query.bind(tiberius::numeric::Numeric::new_with_scale(
                v.mantissa(),
                v.scale() as u8,
            )),
            Value::String(v) => query.bind(v),
            Value::Boolean(v) => query.bind(v),
            Value::Timestamp(v) => query.bind(v),
            Value::Null => query.bind(Option::<String>::None),
        }
    }
}
