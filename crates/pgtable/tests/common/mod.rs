#![allow(dead_code)]

use pgtable::{Entity, Options, Table};

#[derive(Debug, Clone, Default, PartialEq, Entity)]
pub struct TestStruct {
    pub id: i64,
    pub flags: i64,
    pub primary_email: String,
    pub email_secondary: String,
    pub first_name: String,
    pub last_name: String,
    pub age: i64,
    pub price: i64,
    pub post_code: String,
    pub post_code2: String,
    #[orm(sql = "pass")]
    pub password: String,
    pub created_by: i64,
    #[orm(sql = "uniq type:varchar(2000)")]
    pub key: String,
}

pub fn test_table() -> Table {
    Table::of::<TestStruct>(&Options::default())
}

pub const SELECT_PREFIX: &str = r#"SELECT "id","flags","primary_email","email_secondary","first_name","last_name","age","price","post_code","post_code2","password","created_by","key" FROM "test_struct""#;
