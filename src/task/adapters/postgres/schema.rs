//! Diesel schema for task lifecycle persistence.

diesel::table! {
    /// Task records.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Owning caller identity.
        #[max_length = 255]
        owner_id -> Varchar,
        /// Task title.
        title -> Text,
        /// Task description.
        description -> Text,
        /// Task lifecycle status.
        #[max_length = 16]
        status -> Varchar,
        /// Current feedback date.
        feedback_date -> Date,
        /// Optimistic concurrency revision.
        revision -> Int8,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only delay history, removed with its task.
    task_delays (task_id, id) {
        /// Owning task identifier.
        task_id -> Uuid,
        /// Ordinal within the task, starting at 1.
        id -> Int4,
        /// Recorded reason.
        reason -> Text,
        /// Feedback date before the delay.
        old_date -> Date,
        /// Feedback date after the delay.
        new_date -> Date,
        /// Time the delay was recorded.
        created_at -> Timestamptz,
    }
}

diesel::joinable!(task_delays -> tasks (task_id));
diesel::allow_tables_to_appear_in_same_query!(tasks, task_delays);
