//! Attendance subcommand handlers.

use crate::cli::{AttendanceArgs, AttendanceCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::{build_client, build_store, parse_json_arg};

pub async fn handle(args: AttendanceArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let store = build_store(global);
    let client = build_client(global, &store)?;

    let result = match args.command {
        AttendanceCommand::List { course } => {
            serde_json::Value::Array(client.list_attendance(course.as_deref()).await?)
        }
        AttendanceCommand::Create { json } => {
            client.create_attendance(&parse_json_arg(&json)?).await?
        }
        AttendanceCommand::Update { id, json } => {
            client
                .update_attendance(&id, &parse_json_arg(&json)?)
                .await?
        }
        AttendanceCommand::Delete { id } => client.delete_attendance(&id).await?,
    };

    let out = output::render(&global.output, &result);
    output::print_output(&out, global.quiet);
    Ok(())
}
