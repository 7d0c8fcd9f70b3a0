//! SQL schema for the rapport SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Contacts are split across one identity table and four attribute tables,
-- each attribute table holding at most one row per contact.
CREATE TABLE IF NOT EXISTS contacts (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    name      TEXT NOT NULL UNIQUE,
    email     TEXT NOT NULL DEFAULT '',
    phone     TEXT NOT NULL DEFAULT '',
    location  TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS employment (
    contact_id          INTEGER PRIMARY KEY REFERENCES contacts(id) ON DELETE CASCADE,
    current_company     TEXT NOT NULL DEFAULT '',
    previous_companies  TEXT NOT NULL DEFAULT '',  -- comma-delimited set
    industry            TEXT NOT NULL DEFAULT '',  -- comma-delimited set
    job_title           TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS relationships (
    contact_id         INTEGER PRIMARY KEY REFERENCES contacts(id) ON DELETE CASCADE,
    relationship_type  TEXT NOT NULL DEFAULT '',
    closeness          TEXT NOT NULL DEFAULT '',
    reliability        TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS background (
    contact_id   INTEGER PRIMARY KEY REFERENCES contacts(id) ON DELETE CASCADE,
    interests    TEXT NOT NULL DEFAULT '',  -- comma-delimited set
    college      TEXT NOT NULL DEFAULT '',
    high_school  TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS profile (
    contact_id     INTEGER PRIMARY KEY REFERENCES contacts(id) ON DELETE CASCADE,
    career_goals   TEXT NOT NULL DEFAULT '',  -- comma-delimited set
    skills         TEXT NOT NULL DEFAULT '',  -- comma-delimited set
    talent_rating  TEXT NOT NULL DEFAULT ''
);

-- Similarity edges: at most one row per unordered pair. The stored order of
-- person1/person2 is whatever the first writer supplied.
CREATE TABLE IF NOT EXISTS interest_edges (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    person1       TEXT NOT NULL,
    person2       TEXT NOT NULL,
    shared_value  TEXT NOT NULL,
    recorded_at   TEXT NOT NULL,   -- RFC 3339 UTC
    CHECK (person1 != person2)
);
CREATE UNIQUE INDEX IF NOT EXISTS interest_edges_pair_idx
    ON interest_edges (min(person1, person2), max(person1, person2));

CREATE TABLE IF NOT EXISTS goal_edges (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    person1       TEXT NOT NULL,
    person2       TEXT NOT NULL,
    shared_value  TEXT NOT NULL,
    recorded_at   TEXT NOT NULL,
    CHECK (person1 != person2)
);
CREATE UNIQUE INDEX IF NOT EXISTS goal_edges_pair_idx
    ON goal_edges (min(person1, person2), max(person1, person2));

CREATE TABLE IF NOT EXISTS skill_edges (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    person1       TEXT NOT NULL,
    person2       TEXT NOT NULL,
    shared_value  TEXT NOT NULL,
    recorded_at   TEXT NOT NULL,
    CHECK (person1 != person2)
);
CREATE UNIQUE INDEX IF NOT EXISTS skill_edges_pair_idx
    ON skill_edges (min(person1, person2), max(person1, person2));

-- Groups: token -> JSON array of member names. Rewritten wholesale per run.
CREATE TABLE IF NOT EXISTS company_groups (
    token        TEXT PRIMARY KEY,
    members      TEXT NOT NULL,
    computed_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS previous_company_groups (
    token        TEXT PRIMARY KEY,
    members      TEXT NOT NULL,
    computed_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS college_groups (
    token        TEXT PRIMARY KEY,
    members      TEXT NOT NULL,
    computed_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS high_school_groups (
    token        TEXT PRIMARY KEY,
    members      TEXT NOT NULL,
    computed_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS industry_groups (
    token        TEXT PRIMARY KEY,
    members      TEXT NOT NULL,
    computed_at  TEXT NOT NULL
);

PRAGMA user_version = 1;
";

/// Every column of a joined contact row, in [`rapport_core::contact::Field`]
/// order. Missing attribute rows read as empty strings.
pub const SELECT_CONTACT: &str = "
SELECT
    c.id,
    c.name, c.email, c.phone, c.location,
    COALESCE(e.current_company, ''), COALESCE(e.previous_companies, ''),
    COALESCE(e.industry, ''),        COALESCE(e.job_title, ''),
    COALESCE(r.relationship_type, ''), COALESCE(r.closeness, ''),
    COALESCE(r.reliability, ''),
    COALESCE(b.interests, ''), COALESCE(b.college, ''), COALESCE(b.high_school, ''),
    COALESCE(p.career_goals, ''), COALESCE(p.skills, ''), COALESCE(p.talent_rating, '')
FROM contacts c
LEFT JOIN employment    e ON e.contact_id = c.id
LEFT JOIN relationships r ON r.contact_id = c.id
LEFT JOIN background    b ON b.contact_id = c.id
LEFT JOIN profile       p ON p.contact_id = c.id
";
