use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};

use kokkai_minutes::model::{BillAction, Minutes, Speech};
use kokkai_minutes::util::now_utc_string;

pub const DB_SCHEMA_VERSION: &str = "0.1.0";

pub fn open_store(db_path: &Path) -> Result<Connection> {
    let connection = Connection::open(db_path)
        .with_context(|| format!("failed to open {}", db_path.display()))?;
    configure_connection(&connection)?;
    ensure_schema(&connection)?;
    Ok(connection)
}

fn configure_connection(connection: &Connection) -> Result<()> {
    connection
        .pragma_update(None, "journal_mode", "WAL")
        .context("failed to set journal_mode=WAL")?;
    connection
        .pragma_update(None, "synchronous", "NORMAL")
        .context("failed to set synchronous=NORMAL")?;
    Ok(())
}

pub fn ensure_schema(connection: &Connection) -> Result<()> {
    connection
        .execute_batch(
            "
            CREATE TABLE IF NOT EXISTS metadata (
              key TEXT PRIMARY KEY,
              value TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS minutes (
              minutes_id TEXT PRIMARY KEY,
              name TEXT NOT NULL,
              date TEXT,
              topics_json TEXT NOT NULL,
              topic_ids_json TEXT NOT NULL,
              updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS speeches (
              speech_id TEXT PRIMARY KEY,
              minutes_id TEXT NOT NULL,
              order_in_minutes INTEGER NOT NULL,
              speaker TEXT,
              url TEXT,
              FOREIGN KEY(minutes_id) REFERENCES minutes(minutes_id)
            );

            CREATE TABLE IF NOT EXISTS bill_actions (
              bill_action_id TEXT PRIMARY KEY,
              bill_id TEXT NOT NULL,
              minutes_id TEXT NOT NULL,
              type TEXT NOT NULL,
              speech_id TEXT NOT NULL,
              FOREIGN KEY(minutes_id) REFERENCES minutes(minutes_id),
              FOREIGN KEY(speech_id) REFERENCES speeches(speech_id)
            );

            CREATE INDEX IF NOT EXISTS idx_speeches_minutes ON speeches(minutes_id, order_in_minutes);
            CREATE INDEX IF NOT EXISTS idx_bill_actions_minutes ON bill_actions(minutes_id);
            CREATE INDEX IF NOT EXISTS idx_bill_actions_bill ON bill_actions(bill_id);
            ",
        )
        .context("failed to initialize fact store schema")?;

    connection.execute(
        "INSERT INTO metadata(key, value) VALUES('db_schema_version', ?1)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![DB_SCHEMA_VERSION],
    )?;

    Ok(())
}

pub fn upsert_minutes(connection: &Connection, minutes: &Minutes) -> Result<()> {
    let topics_json = serde_json::to_string(&minutes.topics)?;
    let topic_ids_json = serde_json::to_string(&minutes.topic_ids)?;

    connection
        .execute(
            "INSERT INTO minutes(minutes_id, name, date, topics_json, topic_ids_json, updated_at)
             VALUES(?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(minutes_id) DO UPDATE SET
               name = excluded.name,
               date = excluded.date,
               topics_json = excluded.topics_json,
               topic_ids_json = excluded.topic_ids_json,
               updated_at = excluded.updated_at",
            params![
                minutes.id,
                minutes.name,
                minutes.date,
                topics_json,
                topic_ids_json,
                now_utc_string()
            ],
        )
        .with_context(|| format!("failed to upsert minutes {}", minutes.id))?;

    Ok(())
}

pub fn upsert_speeches(connection: &mut Connection, speeches: &[Speech]) -> Result<usize> {
    let tx = connection.transaction()?;
    {
        let mut statement = tx.prepare(
            "INSERT INTO speeches(speech_id, minutes_id, order_in_minutes, speaker, url)
             VALUES(?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(speech_id) DO UPDATE SET
               speaker = excluded.speaker,
               url = excluded.url",
        )?;
        for speech in speeches {
            statement
                .execute(params![
                    speech.id,
                    speech.minutes_id,
                    speech.order_in_minutes,
                    speech.speaker,
                    speech.url
                ])
                .with_context(|| format!("failed to upsert speech {}", speech.id))?;
        }
    }
    tx.commit()?;

    Ok(speeches.len())
}

pub fn replace_bill_actions(
    connection: &mut Connection,
    minutes_id: &str,
    actions: &[BillAction],
) -> Result<usize> {
    let keep_ids = actions
        .iter()
        .map(|action| action.id.as_str())
        .collect::<HashSet<&str>>();

    let tx = connection.transaction()?;
    {
        let mut statement = tx.prepare(
            "INSERT INTO bill_actions(bill_action_id, bill_id, minutes_id, type, speech_id)
             VALUES(?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(bill_action_id) DO UPDATE SET speech_id = excluded.speech_id",
        )?;
        for action in actions {
            statement
                .execute(params![
                    action.id,
                    action.bill_id,
                    action.minutes_id,
                    action.action_type.as_str(),
                    action.speech_id
                ])
                .with_context(|| format!("failed to upsert bill action {}", action.id))?;
        }
    }

    let existing_ids = {
        let mut statement =
            tx.prepare("SELECT bill_action_id FROM bill_actions WHERE minutes_id = ?1")?;
        let rows = statement.query_map(params![minutes_id], |row| row.get::<_, String>(0))?;
        rows.collect::<rusqlite::Result<Vec<String>>>()?
    };

    let mut deleted = 0usize;
    for stale_id in existing_ids
        .iter()
        .filter(|id| !keep_ids.contains(id.as_str()))
    {
        deleted += tx.execute(
            "DELETE FROM bill_actions WHERE bill_action_id = ?1",
            params![stale_id],
        )?;
    }
    tx.commit()?;

    Ok(deleted)
}

pub fn count_rows(connection: &Connection, sql: &str) -> Result<i64> {
    let count = connection.query_row(sql, [], |row| row.get(0))?;
    Ok(count)
}

pub fn schema_version(connection: &Connection) -> Result<Option<String>> {
    let version = connection
        .query_row(
            "SELECT value FROM metadata WHERE key = 'db_schema_version'",
            [],
            |row| row.get(0),
        )
        .optional()?;
    Ok(version)
}
