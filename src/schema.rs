// Kept in sync with data/bootstrap.rs by hand.

diesel::table! {
    users (user_id) {
        user_id -> Integer,
        email -> Text,
        password -> Text,
        created_at -> Timestamp,
    }
}

diesel::table! {
    missions (mission_id) {
        mission_id -> Integer,
        user_id -> Integer,
        name -> Text,
        exam_date -> Nullable<Date>,
        created_at -> Timestamp,
    }
}

diesel::table! {
    subjects (subject_id) {
        subject_id -> Integer,
        mission_id -> Integer,
        name -> Text,
    }
}

diesel::table! {
    topics (topic_id) {
        topic_id -> Integer,
        subject_id -> Integer,
        name -> Text,
    }
}

diesel::table! {
    study_records (record_id) {
        record_id -> Integer,
        user_id -> Integer,
        mission_id -> Integer,
        study_date -> Nullable<Date>,
        subject -> Text,
        topic -> Text,
        correct_count -> Integer,
        total_count -> Integer,
        accuracy_rate -> Nullable<Double>,
        reviewed_24h -> Bool,
        reviewed_07d -> Bool,
        reviewed_15d -> Bool,
        reviewed_30d -> Bool,
        created_at -> Timestamp,
    }
}

diesel::joinable!(missions -> users (user_id));
diesel::joinable!(subjects -> missions (mission_id));
diesel::joinable!(topics -> subjects (subject_id));
diesel::joinable!(study_records -> missions (mission_id));

diesel::allow_tables_to_appear_in_same_query!(
    missions,
    study_records,
    subjects,
    topics,
    users,
);
