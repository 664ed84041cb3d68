//! Course subcommand handlers.

use crate::cli::{CoursesArgs, GlobalOpts, ResourceCommand};
use crate::error::CliError;
use crate::output;

use super::{build_client, build_store, parse_json_arg};

pub async fn handle(args: CoursesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let store = build_store(global);
    let client = build_client(global, &store)?;

    let result = match args.command {
        ResourceCommand::List => serde_json::Value::Array(client.list_courses().await?),
        ResourceCommand::Create { json } => client.create_course(&parse_json_arg(&json)?).await?,
        ResourceCommand::Update { id, json } => {
            client.update_course(&id, &parse_json_arg(&json)?).await?
        }
        ResourceCommand::Delete { id } => client.delete_course(&id).await?,
    };

    let out = output::render(&global.output, &result);
    output::print_output(&out, global.quiet);
    Ok(())
}
