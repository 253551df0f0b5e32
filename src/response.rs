use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct List<T> {
    list: Vec<T>,
    total: i64,
}

impl<T> List<T> {
    pub fn new(list: Vec<T>, total: i64) -> Self {
        List { list, total }
    }
}

/// User facing confirmation carried alongside the payload.
#[derive(Debug, Serialize)]
pub struct Message<T> {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
}

impl<T> Message<T> {
    pub fn new(message: impl Into<String>, data: Option<T>) -> Self {
        Message { message: message.into(), data }
    }
}
