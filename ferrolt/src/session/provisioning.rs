//! Provisioning session implementation.

use std::fmt;
use std::time::Instant;

use log::{debug, info, warn};

use super::response::{CommandOutput, RegistrationOutcome, VerificationOutcome};
use crate::api::{Credentials, OltApi, TestCommand};
use crate::channel::sanitize;
use crate::error::{ApiError, Result};
use crate::parser::{BoardRecord, OntRecord, format_board_status, parse_boards};
use crate::platform::OltPlatform;
use crate::workflow::{Workflow, WorkflowDefaults};

/// Provisioning session over one device-session API client.
///
/// This is the main entry point that handles:
/// - Session state (logged in or not)
/// - Fetching, sanitizing and parsing raw device text
/// - Feeding parsed records into the [`Workflow`]
/// - Submitting registration and verification requests
pub struct ProvisioningSession<A: OltApi> {
    /// API client.
    api: A,

    /// Platform definition.
    platform: OltPlatform,

    /// Form state.
    workflow: Workflow,

    /// Boards from the latest listing.
    boards: Vec<BoardRecord>,

    logged_in: bool,
}

impl<A: OltApi> ProvisioningSession<A> {
    /// Create a new provisioning session.
    pub fn new(api: A, platform: OltPlatform, defaults: WorkflowDefaults) -> Self {
        Self {
            api,
            platform,
            workflow: Workflow::new(defaults),
            boards: Vec::new(),
            logged_in: false,
        }
    }

    /// Get a reference to the API client.
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Get a reference to the platform definition.
    pub fn platform(&self) -> &OltPlatform {
        &self.platform
    }

    /// Get the workflow.
    pub fn workflow(&self) -> &Workflow {
        &self.workflow
    }

    /// Get a mutable reference to the workflow, for field edits.
    pub fn workflow_mut(&mut self) -> &mut Workflow {
        &mut self.workflow
    }

    /// Boards from the latest listing.
    pub fn boards(&self) -> &[BoardRecord] {
        &self.boards
    }

    /// Check if the session is logged in.
    pub fn is_logged_in(&self) -> bool {
        self.logged_in
    }

    fn ensure_logged_in(&self) -> Result<()> {
        if self.logged_in {
            Ok(())
        } else {
            Err(ApiError::NotLoggedIn.into())
        }
    }

    /// Log in to the device.
    pub async fn login(&mut self, credentials: &Credentials) -> Result<()> {
        info!("logging in to OLT as '{}'", credentials.username);
        self.api.login(credentials).await?.into_data()?;
        self.logged_in = true;
        Ok(())
    }

    /// Log out. Local state is cleared even if the API call fails.
    pub async fn logout(&mut self) -> Result<()> {
        if !self.logged_in {
            return Ok(());
        }

        let result = self.api.logout().await;
        self.logged_in = false;
        self.boards.clear();
        result?.into_data()?;
        info!("logged out of OLT");
        Ok(())
    }

    /// Fetch and parse the board listing.
    pub async fn list_boards(&mut self) -> Result<&[BoardRecord]> {
        self.ensure_logged_in()?;

        let raw = self.api.all_boards().await?.into_data()?;
        self.boards = parse_boards(&sanitize(&raw));
        debug!(
            "boards: {:?}",
            self.boards.iter().map(|b| &b.board_id).collect::<Vec<_>>()
        );
        Ok(&self.boards)
    }

    /// Fetch one board's detail listing, reduced to its port table.
    pub async fn board_detail(&mut self, board_id: &str) -> Result<String> {
        self.ensure_logged_in()?;

        let raw = self.api.board_detail(board_id).await?.into_data()?;
        Ok(format_board_status(&sanitize(&raw)))
    }

    /// Run an autofind scan and feed the result into the workflow.
    ///
    /// The first discovered ONT is selected automatically.
    pub async fn discover(&mut self) -> Result<&[OntRecord]> {
        self.ensure_logged_in()?;

        let raw = self.api.ont_autofind().await?.into_data()?;
        let onts = self.platform.autofind_parser().parse(&sanitize(&raw));
        info!("autofind found {} ONT(s)", onts.len());

        self.workflow.apply_autofind(onts);
        Ok(self.workflow.discovered())
    }

    /// Use a discovered ONT for registration.
    pub fn use_ont(&mut self, index: usize) -> Result<&OntRecord> {
        Ok(self.workflow.select(index)?)
    }

    /// CLI commands the platform would run for the current registration.
    pub fn registration_script(&self) -> Result<Vec<String>> {
        let request = self.workflow.registration_request()?;
        Ok(self.platform.behavior().registration_commands(&request))
    }

    /// CLI command the platform would run for the current verification.
    pub fn verification_script(&self) -> Result<Option<String>> {
        let request = self.workflow.verification_request()?;
        Ok(self.platform.behavior().verification_command(&request))
    }

    /// Submit the registration field set.
    ///
    /// A success envelope whose log carries a device failure marker is
    /// reported as a failed outcome. Only a clean registration points the
    /// verification form at the registered ONT.
    pub async fn register(&mut self) -> Result<RegistrationOutcome> {
        self.ensure_logged_in()?;
        let request = self.workflow.registration_request()?;

        info!(
            "registering ONT {} on {}/{} as ont {}",
            request.identity.serial_number,
            request.identity.board_id,
            request.identity.port_id,
            request.identity.ont_id
        );
        let start = Instant::now();
        let raw = self.api.register_ont(&request).await?.into_data()?;
        let elapsed = start.elapsed();

        let log = sanitize(&raw);
        let failure_message = self.platform.detect_failure(&log);
        match &failure_message {
            Some(failure) => warn!("registration rejected by device: {failure}"),
            None => self.workflow.registration_succeeded(),
        }

        Ok(RegistrationOutcome {
            request,
            log,
            failure_message,
            elapsed,
        })
    }

    /// Submit the verification field set.
    pub async fn verify(&mut self) -> Result<VerificationOutcome> {
        self.ensure_logged_in()?;
        let request = self.workflow.verification_request()?;

        let start = Instant::now();
        let raw = self.api.verify_ont(&request).await?.into_data()?;
        let elapsed = start.elapsed();

        let output = sanitize(&raw);
        let failure_message = self.platform.detect_failure(&output);
        let serial_seen = output.contains(request.serial_number.trim());
        debug!(
            "verification of {}: serial_seen={serial_seen} failure={failure_message:?}",
            request.serial_number
        );

        Ok(VerificationOutcome {
            request,
            output,
            serial_seen,
            failure_message,
            elapsed,
        })
    }

    /// Query the status of the ONT in the status form.
    pub async fn ont_status(&mut self) -> Result<CommandOutput> {
        self.ensure_logged_in()?;
        let query = self.workflow.status_request()?;
        let label = format!("ont-status {} {}", query.board_id, query.ont_id);

        let start = Instant::now();
        let raw = self.api.ont_status(&query).await?.into_data()?;
        Ok(self.command_output(label, raw, start))
    }

    /// Look up ONT details by the description in the info form.
    pub async fn ont_info(&mut self) -> Result<CommandOutput> {
        self.ensure_logged_in()?;
        let description = self.workflow.info_description().to_string();
        let label = format!("ont-info {description}");

        let start = Instant::now();
        let raw = self.api.ont_info(&description).await?.into_data()?;
        Ok(self.command_output(label, raw, start))
    }

    /// Run an arbitrary CLI command.
    pub async fn test_command(&mut self, command: &str) -> Result<CommandOutput> {
        self.ensure_logged_in()?;

        let start = Instant::now();
        let raw = self
            .api
            .test_command(&TestCommand::new(command))
            .await?
            .into_data()?;
        let output = self.command_output(command.to_string(), raw, start);
        if let Some(failure) = &output.failure_message {
            warn!("command '{command}' failed: {failure}");
        }
        Ok(output)
    }

    fn command_output(&self, command: String, raw: String, start: Instant) -> CommandOutput {
        let elapsed = start.elapsed();
        let result = self.platform.normalize_output(&raw, &command);
        let failure_message = self.platform.detect_failure(&result);
        CommandOutput {
            command,
            result,
            raw_result: raw,
            elapsed,
            failure_message,
        }
    }
}

impl<A: OltApi> fmt::Debug for ProvisioningSession<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProvisioningSession")
            .field("platform", &self.platform.name)
            .field("workflow", &self.workflow)
            .field("boards", &self.boards.len())
            .field("logged_in", &self.logged_in)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Envelope, RegisterRequest, StatusQuery, VerifyRequest};
    use crate::error::{Error, PlatformError, WorkflowError};
    use crate::session::SessionBuilder;
    use crate::platform::vendors::huawei;
    use crate::workflow::Field;
    use tokio_test::{assert_err, assert_ok};

    const AUTOFIND: &str = "\
   ------------------------------------------------------------------------
   Number              : 1
   F/S/P               : 0/1/5
   Ont SN              : 45485443BA058ED8 (no description)
   VendorID            : HWTC
   ------------------------------------------------------------------------
   Number              : 2
   F/S/P               : 0/1/11
   Ont SN              : 48575443ABCDEF01
   ------------------------------------------------------------------------
   The number of GPON autofind ONT is 2
";

    struct MockApi {
        login: Envelope,
        boards: Envelope,
        detail: Envelope,
        autofind: Envelope,
        register: Envelope,
        verify: Envelope,
        status: Envelope,
        info: Envelope,
        command: Envelope,
        offline: bool,
        calls: Vec<String>,
        registered: Vec<RegisterRequest>,
        verified: Vec<VerifyRequest>,
    }

    impl Default for MockApi {
        fn default() -> Self {
            Self {
                login: Envelope::success(""),
                boards: Envelope::success(
                    "  0  H806GPBD  Normal\n  1  H802SCUN  Active_normal\n  2  -\n",
                ),
                detail: Envelope::success("  0/1/0/0  GPON  Online\n\n  summary\n"),
                autofind: Envelope::success(AUTOFIND),
                register: Envelope::success("  Number of ONTs that can be added: 1, success: 1\n"),
                verify: Envelope::success("  F/S/P  : 0/1/5\n  SN     : 45485443BA058ED8 (HWTC)\n"),
                status: Envelope::success("  Run state : online\n"),
                info: Envelope::success("  Description : test\n"),
                command: Envelope::success("display board 0\n  0  H806GPBD  Normal\nMA5683T#"),
                offline: false,
                calls: Vec::new(),
                registered: Vec::new(),
                verified: Vec::new(),
            }
        }
    }

    impl MockApi {
        fn reply(&mut self, call: &str, envelope: Envelope) -> Result<Envelope> {
            self.calls.push(call.to_string());
            if self.offline {
                return Err(ApiError::Transport("connection refused".to_string()).into());
            }
            Ok(envelope)
        }
    }

    impl OltApi for MockApi {
        async fn login(&mut self, _credentials: &Credentials) -> Result<Envelope> {
            let envelope = self.login.clone();
            self.reply("login", envelope)
        }

        async fn logout(&mut self) -> Result<Envelope> {
            self.reply("logout", Envelope::success(""))
        }

        async fn all_boards(&mut self) -> Result<Envelope> {
            let envelope = self.boards.clone();
            self.reply("all_boards", envelope)
        }

        async fn board_detail(&mut self, board_id: &str) -> Result<Envelope> {
            let envelope = self.detail.clone();
            self.reply(&format!("board_detail {board_id}"), envelope)
        }

        async fn ont_autofind(&mut self) -> Result<Envelope> {
            let envelope = self.autofind.clone();
            self.reply("ont_autofind", envelope)
        }

        async fn register_ont(&mut self, request: &RegisterRequest) -> Result<Envelope> {
            self.registered.push(request.clone());
            let envelope = self.register.clone();
            self.reply("register_ont", envelope)
        }

        async fn verify_ont(&mut self, request: &VerifyRequest) -> Result<Envelope> {
            self.verified.push(request.clone());
            let envelope = self.verify.clone();
            self.reply("verify_ont", envelope)
        }

        async fn ont_status(&mut self, query: &StatusQuery) -> Result<Envelope> {
            let envelope = self.status.clone();
            self.reply(&format!("ont_status {} {}", query.board_id, query.ont_id), envelope)
        }

        async fn ont_info(&mut self, description: &str) -> Result<Envelope> {
            let envelope = self.info.clone();
            self.reply(&format!("ont_info {description}"), envelope)
        }

        async fn test_command(&mut self, request: &TestCommand) -> Result<Envelope> {
            let envelope = self.command.clone();
            self.reply(&format!("test_command {}", request.command), envelope)
        }
    }

    fn session(api: MockApi) -> ProvisioningSession<MockApi> {
        ProvisioningSession::new(api, huawei::platform(), WorkflowDefaults::default())
    }

    async fn logged_in(api: MockApi) -> ProvisioningSession<MockApi> {
        let mut session = session(api);
        assert_ok!(session.login(&Credentials::new("admin", "admin")).await);
        session
    }

    #[test]
    fn test_builder_resolves_platform() {
        let session = assert_ok!(
            SessionBuilder::new(MockApi::default())
                .platform("huawei_ma5600")
                .build()
        );
        assert_eq!(session.platform().name, huawei::PLATFORM_NAME);
        assert!(!session.is_logged_in());

        let err = assert_err!(SessionBuilder::new(MockApi::default()).build());
        assert!(matches!(err, Error::Platform(PlatformError::InvalidDefinition { .. })));

        let err = assert_err!(
            SessionBuilder::new(MockApi::default())
                .platform("zte_c300")
                .build()
        );
        assert!(matches!(err, Error::Platform(PlatformError::UnknownPlatform { .. })));
    }

    #[test]
    fn test_builder_custom_defaults() {
        let defaults = assert_ok!(WorkflowDefaults::from_json_str(r#"{"boardId": "0/2"}"#));
        let session = assert_ok!(
            SessionBuilder::new(MockApi::default())
                .custom_platform(OltPlatform::new("lab"))
                .defaults(defaults)
                .build()
        );
        assert_eq!(session.platform().name, "lab");
        assert_eq!(session.workflow().registration().identity.board_id, "0/2");
        assert_eq!(session.workflow().registration().identity.port_id, "5");
    }

    #[tokio::test]
    async fn test_requires_login() {
        let mut session = session(MockApi::default());
        let err = assert_err!(session.discover().await);
        assert!(matches!(err, Error::Api(ApiError::NotLoggedIn)));
        assert!(session.api().calls.is_empty());
    }

    #[tokio::test]
    async fn test_login_rejected() {
        let api = MockApi {
            login: Envelope::error("Invalid username or password"),
            ..MockApi::default()
        };
        let mut session = session(api);
        let err = assert_err!(session.login(&Credentials::new("admin", "bad")).await);
        assert!(matches!(err, Error::Api(ApiError::Rejected { .. })));
        assert!(!session.is_logged_in());
    }

    #[tokio::test]
    async fn test_list_boards() {
        let mut session = logged_in(MockApi::default()).await;
        let boards = assert_ok!(session.list_boards().await);
        let ids: Vec<_> = boards.iter().map(|b| b.board_id.as_str()).collect();
        assert_eq!(ids, vec!["0/0", "0/1"]);
        assert_eq!(session.boards().len(), 2);
    }

    #[tokio::test]
    async fn test_board_detail_formats_table() {
        let mut session = logged_in(MockApi::default()).await;
        let detail = assert_ok!(session.board_detail("0/1").await);
        assert_eq!(detail, "0/1/0/0  GPON  Online");
        assert_eq!(session.api().calls.last().unwrap(), "board_detail 0/1");
    }

    #[tokio::test]
    async fn test_discover_populates_workflow() {
        let mut session = logged_in(MockApi::default()).await;
        let onts = assert_ok!(session.discover().await);
        assert_eq!(onts.len(), 2);

        let identity = &session.workflow().registration().identity;
        assert_eq!(identity.serial_number, "45485443BA058ED8");
        assert_eq!(identity.port_id, "5");
        assert_eq!(identity.ont_id, "1");
    }

    #[tokio::test]
    async fn test_discover_with_escape_sequences() {
        let api = MockApi {
            autofind: Envelope::success(
                "\x1b[37D---------\r\n\x1b[37DNumber : 7\r\nF/S/P : 0/3/2\r\nOnt SN : 4857544312345678\r\n---------\r\n",
            ),
            ..MockApi::default()
        };
        let mut session = logged_in(api).await;
        let onts = assert_ok!(session.discover().await);
        assert_eq!(onts.len(), 1);
        assert_eq!(onts[0].number, "7");
        assert_eq!(session.workflow().registration().identity.port_id, "2");
    }

    #[tokio::test]
    async fn test_full_workflow() {
        let mut session = logged_in(MockApi::default()).await;
        assert_ok!(session.discover().await);
        assert_ok!(session.use_ont(1));
        session.workflow_mut().set_field(Field::BoardId, "0/1");

        let outcome = assert_ok!(session.register().await);
        assert!(outcome.is_success());
        assert_eq!(outcome.request.identity.serial_number, "48575443ABCDEF01");
        assert_eq!(session.api().registered.len(), 1);
        assert_eq!(session.api().registered[0].identity.port_id, "11");

        // verification follows the registration
        let verification = session.workflow().verification();
        assert_eq!(verification.board_id, "0/1");
        assert_eq!(verification.ont_id, "2");

        let report = assert_ok!(session.verify().await);
        assert_eq!(report.request.serial_number, "48575443ABCDEF01");
        assert!(!report.serial_seen);
        assert!(!report.is_verified());
    }

    #[tokio::test]
    async fn test_verify_sees_serial() {
        let mut session = logged_in(MockApi::default()).await;
        assert_ok!(session.discover().await);
        let report = assert_ok!(session.verify().await);
        assert!(report.is_verified());
        assert_eq!(session.api().verified[0].port_id, "5");
    }

    #[tokio::test]
    async fn test_device_failure_in_registration_log() {
        let api = MockApi {
            register: Envelope::success("ont add 5 1 sn-auth X\n  Failure: SN already exists\n"),
            ..MockApi::default()
        };
        let mut session = logged_in(api).await;
        assert_ok!(session.discover().await);
        session
            .workflow_mut()
            .set_verification_field(Field::OntId, "9")
            .unwrap();

        let outcome = assert_ok!(session.register().await);
        assert!(!outcome.is_success());
        assert_eq!(
            outcome.failure_message.as_deref(),
            Some("Failure: SN already exists")
        );
        // no mirroring on failure
        assert_eq!(session.workflow().verification().ont_id, "9");
    }

    #[tokio::test]
    async fn test_register_rejected_envelope() {
        let api = MockApi {
            register: Envelope {
                data: Some("partial log".to_string()),
                ..Envelope::error("Failed to register ONT")
            },
            ..MockApi::default()
        };
        let mut session = logged_in(api).await;
        assert_ok!(session.discover().await);
        let err = assert_err!(session.register().await);
        match err {
            Error::Api(ApiError::Rejected { message, output }) => {
                assert_eq!(message, "Failed to register ONT");
                assert_eq!(output.as_deref(), Some("partial log"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_register_requires_serial() {
        let mut session = logged_in(MockApi::default()).await;
        let err = assert_err!(session.register().await);
        assert!(matches!(
            err,
            Error::Workflow(WorkflowError::MissingField {
                field: "serialNumber"
            })
        ));
        assert!(session.api().registered.is_empty());
    }

    #[tokio::test]
    async fn test_empty_autofind_keeps_fields() {
        let api = MockApi {
            autofind: Envelope::success("  Failure: The automatically found ONTs do not exist\n"),
            ..MockApi::default()
        };
        let mut session = logged_in(api).await;
        session.workflow_mut().set_field(Field::SerialNumber, "MANUAL");
        let onts = assert_ok!(session.discover().await);
        assert!(onts.is_empty());
        assert_eq!(
            session.workflow().registration().identity.serial_number,
            "MANUAL"
        );
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let mut session = logged_in(MockApi::default()).await;
        session.api.offline = true;
        let err = assert_err!(session.list_boards().await);
        assert!(matches!(err, Error::Api(ApiError::Transport(_))));
    }

    #[tokio::test]
    async fn test_test_command_normalizes_output() {
        let mut session = logged_in(MockApi::default()).await;
        let output = assert_ok!(session.test_command("display board 0").await);
        assert_eq!(output.result, "0  H806GPBD  Normal");
        assert_eq!(output.lines().collect::<Vec<_>>(), vec!["0  H806GPBD  Normal"]);
        assert!(output.is_success());
        assert!(output.raw_result.ends_with("MA5683T#"));
    }

    #[tokio::test]
    async fn test_status_and_info_use_forms() {
        let mut session = logged_in(MockApi::default()).await;
        session
            .workflow_mut()
            .set_status_field(Field::OntId, "4")
            .unwrap();
        session.workflow_mut().set_info_description("lobby");

        let status = assert_ok!(session.ont_status().await);
        assert!(status.contains("online"));
        let info = assert_ok!(session.ont_info().await);
        assert_eq!(info.command, "ont-info lobby");

        let calls = &session.api().calls;
        assert!(calls.contains(&"ont_status 0/0 4".to_string()));
        assert!(calls.contains(&"ont_info lobby".to_string()));
    }

    #[tokio::test]
    async fn test_scripts_follow_fields() {
        let mut session = logged_in(MockApi::default()).await;
        assert_ok!(session.discover().await);
        let script = assert_ok!(session.registration_script());
        assert_eq!(script[2], "interface gpon 0/0");
        assert!(script[3].starts_with("ont add 5 1 sn-auth 45485443BA058ED8"));
        assert_eq!(
            assert_ok!(session.verification_script()).as_deref(),
            Some("display ont info 0 0 5 1")
        );
    }

    #[tokio::test]
    async fn test_logout_clears_state() {
        let mut session = logged_in(MockApi::default()).await;
        assert_ok!(session.list_boards().await);
        assert_ok!(session.logout().await);
        assert!(!session.is_logged_in());
        assert!(session.boards().is_empty());
        // second logout is a no-op
        assert_ok!(session.logout().await);
        assert_eq!(
            session.api().calls.iter().filter(|c| *c == "logout").count(),
            1
        );
    }
}
