table! {
    activities (id) {
        id -> Integer,
        name -> Text,
        parent_id -> Nullable<Integer>,
        depth -> Integer,
    }
}

table! {
    buildings (id) {
        id -> Integer,
        address -> Text,
        latitude -> Double,
        longitude -> Double,
    }
}

table! {
    org_activity_link (organization_id, activity_id) {
        organization_id -> Integer,
        activity_id -> Integer,
    }
}

table! {
    organizations (id) {
        id -> Integer,
        name -> Text,
        building_id -> Integer,
    }
}

table! {
    phones (id) {
        id -> Integer,
        organization_id -> Integer,
        number -> Text,
    }
}

joinable!(org_activity_link -> activities (activity_id));
joinable!(org_activity_link -> organizations (organization_id));
joinable!(organizations -> buildings (building_id));
joinable!(phones -> organizations (organization_id));

allow_tables_to_appear_in_same_query!(
    activities,
    buildings,
    org_activity_link,
    organizations,
    phones,
);
