//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. When a
//! migration changes a table, update the matching block here (or regenerate
//! with `diesel print-schema`).

diesel::table! {
    users (id) {
        id -> Int8,
        name -> Varchar,
        email -> Varchar,
        picture -> Nullable<Varchar>,
        admin -> Bool,
        password_digest -> Varchar,
        activated -> Bool,
        activated_at -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Outfits. Size columns hold attribute codes with `0` meaning unset.
    coordinates (id) {
        id -> Int8,
        user_id -> Int8,
        season -> Int2,
        tpo -> Int2,
        picture -> Nullable<Varchar>,
        memo -> Text,
        rating -> Float8,
        top_length -> Int2,
        top_sleeve -> Int2,
        bottom_length -> Int2,
        bottom_type -> Int2,
        dress_length -> Int2,
        dress_sleeve -> Int2,
        outer_length -> Int2,
        outer_sleeve -> Int2,
        shoe_size -> Float8,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    items (id) {
        id -> Int8,
        user_id -> Int8,
        coordinate_id -> Nullable<Int8>,
        super_item -> Varchar,
        season -> Int2,
        tpo -> Int2,
        color -> Int2,
        content -> Text,
        memo -> Text,
        picture -> Nullable<Varchar>,
        rating -> Float8,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    comments (id) {
        id -> Int8,
        user_id -> Int8,
        coordinate_id -> Int8,
        comment -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    like_coordinates (id) {
        id -> Int8,
        user_id -> Int8,
        coordinate_id -> Int8,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Directed follow edges.
    relationships (id) {
        id -> Int8,
        follower_id -> Int8,
        followed_id -> Int8,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    blocks (id) {
        id -> Int8,
        blocker_id -> Int8,
        blocked_id -> Int8,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    notifications (id) {
        id -> Int8,
        sender_id -> Int8,
        receiver_id -> Int8,
        action -> Varchar,
        coordinate_id -> Nullable<Int8>,
        comment_id -> Nullable<Int8>,
        like_coordinate_id -> Nullable<Int8>,
        checked -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(coordinates -> users (user_id));
diesel::joinable!(items -> coordinates (coordinate_id));
diesel::joinable!(comments -> coordinates (coordinate_id));
diesel::joinable!(like_coordinates -> coordinates (coordinate_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    coordinates,
    items,
    comments,
    like_coordinates,
    relationships,
    blocks,
    notifications,
);
