// SPDX-FileCopyrightText: 2026 ChatterNest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Profile document operations.

use chatternest_core::ChatterNestError;
use chrono::{SecondsFormat, Utc};
use rusqlite::params;

use crate::database::Database;
use crate::models::{ProfileUpdate, UserProfile};

/// Create a profile document if one does not exist for `uid`.
///
/// An existing profile is left untouched. The default display name is the
/// email local part, falling back to `"User"` when the email is unusable.
pub async fn insert_profile_if_absent(
    db: &Database,
    uid: &str,
    email: &str,
    display_name: Option<&str>,
) -> Result<(), ChatterNestError> {
    let profile = UserProfile {
        uid: uid.to_string(),
        display_name: display_name
            .map(str::to_string)
            .or_else(|| email.split('@').next().map(str::to_string))
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "User".to_string()),
        email: email.to_string(),
        photo_url: None,
        created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    };

    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT OR IGNORE INTO profiles (uid, display_name, email, photo_url, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    profile.uid,
                    profile.display_name,
                    profile.email,
                    profile.photo_url,
                    profile.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a profile document by user id.
pub async fn get_profile(db: &Database, uid: &str) -> Result<Option<UserProfile>, ChatterNestError> {
    let uid = uid.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT uid, display_name, email, photo_url, created_at
                 FROM profiles WHERE uid = ?1",
            )?;
            let result = stmt.query_row(params![uid], |row| {
                Ok(UserProfile {
                    uid: row.get(0)?,
                    display_name: row.get(1)?,
                    email: row.get(2)?,
                    photo_url: row.get(3)?,
                    created_at: row.get(4)?,
                })
            });
            match result {
                Ok(profile) => Ok(Some(profile)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Apply a merge-patch to a profile document: only supplied fields change.
pub async fn update_profile(
    db: &Database,
    uid: &str,
    update: &ProfileUpdate,
) -> Result<(), ChatterNestError> {
    let uid = uid.to_string();
    let update = update.clone();
    db.connection()
        .call(move |conn| {
            if let Some(ref display_name) = update.display_name {
                conn.execute(
                    "UPDATE profiles SET display_name = ?1 WHERE uid = ?2",
                    params![display_name, uid],
                )?;
            }
            if let Some(ref photo_url) = update.photo_url {
                conn.execute(
                    "UPDATE profiles SET photo_url = ?1 WHERE uid = ?2",
                    params![photo_url, uid],
                )?;
            }
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}
