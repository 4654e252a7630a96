//! Diesel schema for board persistence.

diesel::table! {
    /// Project boards.
    projects (id) {
        /// Project identifier.
        id -> Uuid,
        /// Display name.
        name -> Text,
        /// Identifier of the creating user.
        created_by -> Text,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Task records with shared timer state.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Owning project.
        project_id -> Uuid,
        /// Title.
        title -> Text,
        /// Description.
        description -> Text,
        /// JSON array of assigned user ids.
        assignee_user_ids -> Jsonb,
        /// Workflow status.
        #[max_length = 20]
        status -> Varchar,
        /// Position within the status column.
        position -> Int8,
        /// JSON array of active user ids.
        active_user_ids -> Jsonb,
        /// Start of the open interval.
        last_start_at -> Nullable<Timestamptz>,
        /// Total of closed intervals in milliseconds.
        accumulated_ms -> Int8,
        /// Revision used by compare-and-set updates.
        version -> Int8,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(tasks -> projects (project_id));
diesel::allow_tables_to_appear_in_same_query!(projects, tasks);
