//! Output helpers.
//!

use std::fmt::Debug;

use csv::WriterBuilder;
use eyre::Result;
use serde::Serialize;
use tracing::trace;

/// Output any list of flat serializable rows as CSV.
///
#[tracing::instrument(skip(data))]
pub fn prepare_csv<T>(data: &[T], header: bool) -> Result<String>
where
    T: Serialize + Debug,
{
    trace!("Generating output…");
    // Prepare the writer
    //
    let mut wtr = WriterBuilder::new()
        .has_headers(header)
        .from_writer(vec![]);

    // Insert data
    //
    for rec in data {
        wtr.serialize(rec)?;
    }

    // Output final csv
    //
    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}
