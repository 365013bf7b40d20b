//! Diesel table definitions for the PostgreSQL schema.
//!
//! These must match `backend/migrations` exactly.

diesel::table! {
    /// Registered explorers and their experience totals.
    users (id) {
        id -> Uuid,
        /// Unique, 3 to 32 characters.
        username -> Varchar,
        total_xp -> Int8,
        /// Never decreases.
        level -> Int8,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    cities (id) {
        id -> Uuid,
        name -> Varchar,
        country -> Varchar,
        center_latitude -> Float8,
        center_longitude -> Float8,
    }
}

diesel::table! {
    /// Discoverable points of interest.
    landmarks (id) {
        id -> Uuid,
        city_id -> Uuid,
        name -> Varchar,
        description -> Nullable<Text>,
        /// Free-form label; unknown values earn the fallback award.
        category -> Varchar,
        year_established -> Nullable<Int4>,
        latitude -> Float8,
        longitude -> Float8,
        discovery_radius_meters -> Int4,
        image_url -> Nullable<Text>,
        summary -> Nullable<Text>,
    }
}

diesel::table! {
    /// Unlockable city areas.
    regions (id) {
        id -> Uuid,
        city_id -> Uuid,
        name -> Varchar,
        /// Closed ring of `{latitude, longitude}` objects.
        boundary -> Jsonb,
        unlock_threshold -> Int4,
    }
}

diesel::table! {
    /// Discovery ledger. `(user_id, landmark_id)` is unique.
    discoveries (id) {
        id -> Uuid,
        user_id -> Uuid,
        landmark_id -> Uuid,
        method -> Varchar,
        discovered_at -> Timestamptz,
        reported_latitude -> Nullable<Float8>,
        reported_longitude -> Nullable<Float8>,
        xp_earned -> Int8,
    }
}

diesel::table! {
    /// Cached per-city progress.
    user_progress (user_id, city_id) {
        user_id -> Uuid,
        city_id -> Uuid,
        landmarks_discovered -> Int8,
        total_landmarks -> Int8,
        unlocked_region_ids -> Array<Uuid>,
        created_at -> Timestamptz,
        last_computed_at -> Nullable<Timestamptz>,
    }
}

diesel::joinable!(landmarks -> cities (city_id));
diesel::joinable!(regions -> cities (city_id));
diesel::joinable!(discoveries -> users (user_id));
diesel::joinable!(discoveries -> landmarks (landmark_id));
diesel::joinable!(user_progress -> users (user_id));
diesel::joinable!(user_progress -> cities (city_id));

diesel::allow_tables_to_appear_in_same_query!(
    cities,
    discoveries,
    landmarks,
    regions,
    user_progress,
    users,
);
