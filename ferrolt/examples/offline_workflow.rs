//! Offline example: run the discover, register and verify workflow against
//! canned device output.
//!
//! The API client here replays text captured from a Huawei MA5683T, so no
//! device is needed. A real client would forward each call to the
//! device-session service and decode its JSON reply with
//! [`Envelope::from_json`].
//!
//! # Usage
//!
//! ```bash
//! cargo run --example offline_workflow
//! RUST_LOG=debug cargo run --example offline_workflow
//! ```

use ferrolt::SessionBuilder;
use ferrolt::api::{
    Credentials, Envelope, OltApi, RegisterRequest, StatusQuery, TestCommand, VerifyRequest,
};

const BOARDS: &str = "\
  -------------------------------------------------------------------------
  SlotID  BoardName  Status          SubType0 SubType1    Online/Offline
  -------------------------------------------------------------------------
  0       H806GPBD   Normal
  1       H802SCUN   Active_normal
  2       -
  -------------------------------------------------------------------------
";

const AUTOFIND: &str = "\x1b[37D   ----------------------------------------------------------------------------\r
   Number              : 1\r
   F/S/P               : 0/1/5\r
   Ont SN              : 48575443ABCDEF01 (HWTC-ABCDEF01)\r
   Password            : 0x00000000000000000000\r
   VendorID            : HWTC\r
   Ont Version         : 10C7.A\r
   Ont SoftwareVersion : V3R017C10S120\r
   Ont EquipmentID     : 245H\r
   Ont autofind time   : 2024-03-01 10:00:00+08:00\r
   ----------------------------------------------------------------------------\r
   The number of GPON autofind ONT is 1\r
";

const VERIFY: &str = "\
  F/S/P                   : 0/1/5
  ONT-ID                  : 1
  Control flag            : active
  Run state               : online
  SN                      : 48575443ABCDEF01 (HWTC-ABCDEF01)
";

/// Replays canned output.
struct ReplayApi;

impl OltApi for ReplayApi {
    async fn login(&mut self, _credentials: &Credentials) -> Result<Envelope, ferrolt::Error> {
        Ok(Envelope::success("Logged in"))
    }

    async fn logout(&mut self) -> Result<Envelope, ferrolt::Error> {
        Ok(Envelope::success(""))
    }

    async fn all_boards(&mut self) -> Result<Envelope, ferrolt::Error> {
        Ok(Envelope::success(BOARDS))
    }

    async fn board_detail(&mut self, _board_id: &str) -> Result<Envelope, ferrolt::Error> {
        Ok(Envelope::success("  0/1/0/0  GPON  Online\n  0/1/0/1  GPON  Online\n"))
    }

    async fn ont_autofind(&mut self) -> Result<Envelope, ferrolt::Error> {
        Ok(Envelope::success(AUTOFIND))
    }

    async fn register_ont(
        &mut self,
        _request: &RegisterRequest,
    ) -> Result<Envelope, ferrolt::Error> {
        Ok(Envelope::success(
            "  Number of ONTs that can be added: 1, success: 1\n  PortID :5, ONTID :1",
        ))
    }

    async fn verify_ont(&mut self, _request: &VerifyRequest) -> Result<Envelope, ferrolt::Error> {
        Ok(Envelope::success(VERIFY))
    }

    async fn ont_status(&mut self, _query: &StatusQuery) -> Result<Envelope, ferrolt::Error> {
        Ok(Envelope::success("  Run state : online"))
    }

    async fn ont_info(&mut self, _description: &str) -> Result<Envelope, ferrolt::Error> {
        Ok(Envelope::error("No ONT with that description"))
    }

    async fn test_command(&mut self, request: &TestCommand) -> Result<Envelope, ferrolt::Error> {
        Ok(Envelope::success(format!("{}\n  ok\nMA5683T#", request.command)))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (set RUST_LOG=debug for verbose output)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut session = SessionBuilder::new(ReplayApi)
        .platform("huawei_ma5600")
        .build()?;
    session.login(&Credentials::new("admin", "admin")).await?;

    println!("=== Boards ===");
    for board in session.list_boards().await? {
        println!("  {} {} ({})", board.board_id, board.board_name, board.status);
    }

    println!("\n=== Board 0/1 ===");
    println!("{}", session.board_detail("0/1").await?);

    println!("\n=== Autofind ===");
    for ont in session.discover().await? {
        println!("{}", serde_json::to_string_pretty(ont)?);
    }

    session
        .workflow_mut()
        .set_field(ferrolt::Field::BoardId, "0/1");
    session
        .workflow_mut()
        .set_field(ferrolt::Field::Description, "lobby");

    println!("\n=== Registration script ===");
    for line in session.registration_script()? {
        println!("  {line}");
    }

    let outcome = session.register().await?;
    println!("\nregistration success: {}", outcome.is_success());

    let report = session.verify().await?;
    println!("verified: {} in {:?}", report.is_verified(), report.elapsed);

    match session.ont_info().await {
        Ok(info) => println!("\n{info}"),
        Err(e) => println!("\nont info failed: {e}"),
    }

    session.logout().await?;
    Ok(())
}
