pub mod adapter;
pub mod error;
pub mod settings;

pub mod file {
    pub mod csv {
        pub mod error;
        pub mod headers;
        pub mod reader;
    }
}

pub mod sql {
    pub mod base {
        pub mod adapter;
        pub mod error;
        pub mod introspection;
        pub mod row;
    }

    pub mod mssql {
        pub mod adapter;
        pub mod params;
    }

    pub mod postgres {
        pub mod adapter;
        pub mod params;
        pub mod utils;
    }
}
