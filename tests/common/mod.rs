use std::fs::File;
use std::io::Error;
use std::path::Path;

pub const HEADER: [&str; 6] = ["action", "user", "step", "actor", "data", "reason"];

pub const IDENTITY_DATA: &str =
    "full_name=Jane Doe|date_of_birth=1990-04-02|document_id=P1234567";

#[allow(dead_code)]
pub fn write_actions(path: &Path, rows: &[[&str; 6]]) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);

    wtr.write_record(HEADER)?;
    for row in rows {
        wtr.write_record(row)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Generates a submit + approve of step 1 for each of `users` users,
/// reviewed by `ops-1`.
#[allow(dead_code)]
pub fn generate_onboarding_csv(path: &Path, users: usize) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);

    wtr.write_record(HEADER)?;
    for user in 1..=users {
        let user = user.to_string();
        wtr.write_record(["submit", user.as_str(), "1", "", IDENTITY_DATA, ""])?;
        wtr.write_record(["approve", user.as_str(), "1", "ops-1", "", ""])?;
    }

    wtr.flush()?;
    Ok(())
}
