// Esquema Diesel de las tablas de gleaning.
// Tablas: jobs, file_types, files, file_uses, job_value_keys,
// job_float_values, job_char_values
use diesel::allow_tables_to_appear_in_same_query;
diesel::table! {
    jobs (id) {
        id -> Text,
        number -> Text,
        task_name -> Text,
        directory -> Text,
        status -> Integer,
        created_at_ts -> BigInt,
    }
}
diesel::table! {
    file_types (name) {
        name -> Text,
        description -> Text,
    }
}
diesel::table! {
    files (id) {
        id -> Text,
        name -> Nullable<Text>,
        annotation -> Nullable<Text>,
        file_type -> Text,
        sub_type -> Nullable<Integer>,
        content -> Nullable<Integer>,
        job_id -> Text,
        directory -> Integer,
        job_param_name -> Text,
        created_at_ts -> BigInt,
    }
}
diesel::table! {
    file_uses (id) {
        id -> Text,
        file_id -> Text,
        job_id -> Text,
        role -> Integer,
        job_param_name -> Text,
        created_at_ts -> BigInt,
    }
}
diesel::table! {
    job_value_keys (name) {
        name -> Text,
        description -> Text,
    }
}
diesel::table! {
    job_float_values (id) {
        id -> Text,
        job_id -> Text,
        key_name -> Text,
        value -> Double,
        created_at_ts -> BigInt,
    }
}
diesel::table! {
    job_char_values (id) {
        id -> Text,
        job_id -> Text,
        key_name -> Text,
        value -> Text,
        created_at_ts -> BigInt,
    }
}
allow_tables_to_appear_in_same_query!(jobs,
                                      file_types,
                                      files,
                                      file_uses,
                                      job_value_keys,
                                      job_float_values,
                                      job_char_values);
