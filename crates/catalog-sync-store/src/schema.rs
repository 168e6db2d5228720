use rusqlite_migration::{Migrations, M};

pub fn migrations() -> Migrations<'static> {
    Migrations::new(vec![M::up(
        "CREATE TABLE channels (
            id              INTEGER PRIMARY KEY,
            name            TEXT NOT NULL,
            remote_id       INTEGER,
            active          INTEGER NOT NULL DEFAULT 1
        );

        CREATE TABLE product_listings (
            product_id      INTEGER NOT NULL,
            channel_id      INTEGER NOT NULL,
            listing_id      INTEGER,
            listing_state   TEXT NOT NULL,
            name            TEXT NOT NULL,
            is_visible      INTEGER NOT NULL,
            status          TEXT NOT NULL,
            payload_json    TEXT NOT NULL DEFAULT '{}',
            pending_push    INTEGER NOT NULL DEFAULT 0,
            imported_at     TEXT NOT NULL,
            PRIMARY KEY (product_id, channel_id),
            FOREIGN KEY (channel_id) REFERENCES channels(id)
        );

        CREATE INDEX idx_product_listings_pending ON product_listings(pending_push);",
    )])
}
