pub mod core {
    pub mod data_type;
    pub mod value;
}

pub mod catalog {
    pub mod field;
    pub mod mapping;
    pub mod reference;
}

pub mod records {
    pub mod result;
    pub mod row;
}
