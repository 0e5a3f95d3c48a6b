//! Pokes a locally running server, start it with `cargo run -p shell-shim-server` first.

use shell_shim_api::api::{CommandRequest, CommandResult};

const URL: &str = "http://localhost:5000";

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let hc = httpc_test::new_client(URL)?;

    hc.do_get("/health").await?.print().await?;

    let requests = [
        CommandRequest::new("pwd"),
        CommandRequest::new("ls | head -n 3"),
        CommandRequest::new("exit 1"),
        CommandRequest::default(),
    ];
    for request in requests {
        let response = hc
            .do_post("/run-command", serde_json::to_value(&request)?)
            .await?;
        response.print().await?;
        if let CommandResult::Success { output } = response.json_body_as()? {
            println!("OUTPUT: {output}");
        }
    }

    Ok(())
}
