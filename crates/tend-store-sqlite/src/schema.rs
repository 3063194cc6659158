//! SQL schema for the Tend SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS relationships (
    relationship_id   TEXT PRIMARY KEY,
    owner_id          TEXT NOT NULL,
    name              TEXT NOT NULL,
    relationship_type TEXT NOT NULL,   -- 'partner' | 'family' | 'friend' | ...
    notes             TEXT,
    photo_ref         TEXT,
    created_at        TEXT NOT NULL    -- RFC 3339 UTC, fixed microsecond width
);

-- Check-ins, echoes and analytics events are strictly append-only.
-- No UPDATE or DELETE is ever issued against these tables.
CREATE TABLE IF NOT EXISTS checkins (
    checkin_id      TEXT PRIMARY KEY,
    owner_id        TEXT NOT NULL,
    relationship_id TEXT NOT NULL REFERENCES relationships(relationship_id),
    type            TEXT NOT NULL CHECK (type IN ('pinged', 'thought')),
    note            TEXT CHECK (note IS NULL OR length(note) <= 200),
    created_at      TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS profiles (
    owner_id       TEXT PRIMARY KEY,
    echoes_enabled INTEGER NOT NULL DEFAULT 1,
    updated_at     TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS echoes (
    echo_id          TEXT PRIMARY KEY,
    owner_id         TEXT NOT NULL,
    relationship_id  TEXT REFERENCES relationships(relationship_id),
    source           TEXT NOT NULL CHECK (source IN ('checkin', 'dream', 'gratitude')),
    text             TEXT NOT NULL,
    importance_score INTEGER NOT NULL DEFAULT 1,
    created_at       TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS analytics_events (
    event_id   TEXT PRIMARY KEY,
    owner_id   TEXT NOT NULL,
    event_name TEXT NOT NULL,
    metadata   TEXT NOT NULL DEFAULT '{}',   -- JSON object
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS relationships_owner_idx ON relationships(owner_id, created_at);
CREATE INDEX IF NOT EXISTS checkins_rel_idx        ON checkins(relationship_id, created_at);
CREATE INDEX IF NOT EXISTS echoes_owner_idx        ON echoes(owner_id, created_at);
CREATE INDEX IF NOT EXISTS analytics_owner_idx     ON analytics_events(owner_id, created_at);

PRAGMA user_version = 1;
";
