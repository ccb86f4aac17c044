//! Synchronous TCP transport implementing the [`Host`] surface.
//!
//! [`RemoteHost`] speaks the command-response protocol of
//! [`crate::protocol`] over one TCP stream. Every device handle shares the
//! connection; a mutex serialises request/response round-trips so
//! concurrent device calls cannot interleave frames.

use std::net::{TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use log::{debug, info, warn};
use parking_lot::Mutex;

use robolink_core::config::SessionConfig;
use robolink_core::error::{ConfigError, DeviceError, RobolinkError};

use crate::arm::{Arm, ArmState};
use crate::camera::{CameraFrame, ColorCamera};
use crate::host::Host;
use crate::protocol::{Request, Response};
use crate::text::{TextInstruction, TextInstructions};
use crate::types::{CommandStatus, Pose};
use crate::vacuum::{Vacuum, VacuumGauge, VacuumState};
use crate::{framing, protocol::ProtocolError};

// ---------------------------------------------------------------------------
// Connection
// ---------------------------------------------------------------------------

/// Shared connection state behind every device handle.
#[derive(Debug)]
struct Connection {
    stream: Mutex<TcpStream>,
    closed: AtomicBool,
    read_timeout: Duration,
}

impl Connection {
    /// One request/response round-trip with the configured read timeout.
    fn roundtrip(&self, device: &str, request: &Request) -> Result<Response, DeviceError> {
        self.roundtrip_with_timeout(device, request, self.read_timeout)
    }

    /// One request/response round-trip with an explicit read timeout.
    fn roundtrip_with_timeout(
        &self,
        device: &str,
        request: &Request,
        timeout: Duration,
    ) -> Result<Response, DeviceError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(DeviceError::Closed);
        }

        let mut stream = self.stream.lock();
        stream
            .set_read_timeout(Some(timeout))
            .map_err(|e| DeviceError::Protocol(e.to_string()))?;

        debug!("request: {request:?}");
        framing::write_message(&mut *stream, request)
            .map_err(|e| map_transport_error(e, device, timeout))?;

        let response: Response = framing::read_message(&mut *stream)
            .map_err(|e| map_transport_error(e, device, timeout))?
            .ok_or_else(|| DeviceError::Protocol(ProtocolError::Disconnected.to_string()))?;
        debug!("response: {}", response.variant_name());

        if let Response::Error { message } = response {
            return Err(DeviceError::Rejected { message });
        }
        Ok(response)
    }
}

fn map_transport_error(err: ProtocolError, device: &str, timeout: Duration) -> DeviceError {
    match err {
        ProtocolError::TimedOut => DeviceError::Timeout {
            device: device.to_string(),
            seconds: timeout.as_secs(),
        },
        other => DeviceError::Protocol(other.to_string()),
    }
}

fn unexpected(expected: &str, got: &Response) -> DeviceError {
    DeviceError::UnexpectedResponse {
        expected: expected.into(),
        got: got.variant_name().into(),
    }
}

// ---------------------------------------------------------------------------
// RemoteHost
// ---------------------------------------------------------------------------

/// TCP client for a remote robot host.
///
/// # Example
///
/// ```no_run
/// use robolink_core::config::SessionConfig;
/// use robolink_host::remote::RemoteHost;
///
/// let config = SessionConfig::default();
/// let host = RemoteHost::connect(&config).unwrap();
/// ```
#[derive(Debug)]
pub struct RemoteHost {
    conn: Arc<Connection>,
}

impl RemoteHost {
    /// Connect to the host named in `config`.
    ///
    /// Validates the configuration, resolves the address and opens the
    /// TCP stream with the configured connect timeout.
    pub fn connect(config: &SessionConfig) -> Result<Self, RobolinkError> {
        config.validate()?;

        let addr = config
            .robot_addr
            .to_socket_addrs()
            .map_err(|_| ConfigError::InvalidAddress(config.robot_addr.clone()))?
            .next()
            .ok_or_else(|| ConfigError::InvalidAddress(config.robot_addr.clone()))?;

        let stream = TcpStream::connect_timeout(&addr, config.connect_timeout())
            .map_err(|e| DeviceError::Protocol(format!("connect to {addr} failed: {e}")))?;
        stream
            .set_nodelay(true)
            .map_err(|e| DeviceError::Protocol(e.to_string()))?;
        info!("connected to robot host at {addr}");

        Ok(Self {
            conn: Arc::new(Connection {
                stream: Mutex::new(stream),
                closed: AtomicBool::new(false),
                read_timeout: config.read_timeout(),
            }),
        })
    }
}

impl Host for RemoteHost {
    fn arm(&self) -> Option<Arc<dyn Arm>> {
        Some(Arc::new(RemoteArm {
            conn: Arc::clone(&self.conn),
            device_name: String::new(),
        }))
    }

    fn vacuum(&self) -> Option<Arc<dyn Vacuum>> {
        Some(Arc::new(RemoteVacuum {
            conn: Arc::clone(&self.conn),
            device_name: String::new(),
        }))
    }

    fn color_camera(&self) -> Option<Arc<dyn ColorCamera>> {
        Some(Arc::new(RemoteColorCamera {
            conn: Arc::clone(&self.conn),
            device_name: String::new(),
        }))
    }

    fn text_instructions(&self) -> Option<Arc<dyn TextInstructions>> {
        Some(Arc::new(RemoteTextInstructions {
            conn: Arc::clone(&self.conn),
        }))
    }

    fn reset(&self) -> Result<(), DeviceError> {
        match self.conn.roundtrip("", &Request::Reset)? {
            Response::ResetDone => Ok(()),
            other => Err(unexpected("reset_done", &other)),
        }
    }

    fn close(&self) -> Result<(), DeviceError> {
        if self.conn.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        // Best-effort goodbye; the socket is dropped regardless.
        let mut stream = self.conn.stream.lock();
        if let Err(e) = framing::write_message(&mut *stream, &Request::Close) {
            warn!("close handshake failed: {e}");
        }
        let _ = stream.shutdown(std::net::Shutdown::Both);
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.conn.closed.load(Ordering::SeqCst)
    }
}

impl Drop for RemoteHost {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

// ---------------------------------------------------------------------------
// Device handles
// ---------------------------------------------------------------------------

struct RemoteArm {
    conn: Arc<Connection>,
    device_name: String,
}

impl RemoteArm {
    fn request_state(&self, timeout: Duration) -> Result<ArmState, DeviceError> {
        let request = Request::ArmState {
            device: self.device_name.clone(),
        };
        match self
            .conn
            .roundtrip_with_timeout(&self.device_name, &request, timeout)?
        {
            Response::ArmState(state) => Ok(state),
            other => Err(unexpected("arm_state", &other)),
        }
    }

    fn request_status(&self, request: &Request) -> Result<CommandStatus, DeviceError> {
        match self.conn.roundtrip(&self.device_name, request)? {
            Response::Status(status) => Ok(status),
            other => Err(unexpected("status", &other)),
        }
    }
}

impl Arm for RemoteArm {
    fn device_name(&self) -> &str {
        &self.device_name
    }

    fn state(&self) -> Result<ArmState, DeviceError> {
        self.request_state(self.conn.read_timeout)
    }

    fn fetch_state(&self, timeout: Duration) -> Result<ArmState, DeviceError> {
        self.request_state(timeout)
    }

    fn to_joints(&self, joints: &[f64]) -> Result<CommandStatus, DeviceError> {
        self.request_status(&Request::ToJoints {
            device: self.device_name.clone(),
            joints: joints.to_vec(),
        })
    }

    fn to_pose(&self, pose: &Pose) -> Result<CommandStatus, DeviceError> {
        self.request_status(&Request::ToPose {
            device: self.device_name.clone(),
            pose: pose.clone(),
        })
    }

    fn stop(&self) -> Result<CommandStatus, DeviceError> {
        self.request_status(&Request::Stop {
            device: self.device_name.clone(),
        })
    }
}

struct RemoteVacuum {
    conn: Arc<Connection>,
    device_name: String,
}

impl Vacuum for RemoteVacuum {
    fn device_name(&self) -> &str {
        &self.device_name
    }

    fn state(&self) -> Result<VacuumState, DeviceError> {
        let request = Request::VacuumState {
            device: self.device_name.clone(),
        };
        match self.conn.roundtrip(&self.device_name, &request)? {
            Response::VacuumState(state) => Ok(state),
            other => Err(unexpected("vacuum_state", &other)),
        }
    }

    fn gauge(&self) -> Result<VacuumGauge, DeviceError> {
        let request = Request::VacuumGauge {
            device: self.device_name.clone(),
        };
        match self.conn.roundtrip(&self.device_name, &request)? {
            Response::VacuumGauge(gauge) => Ok(gauge),
            other => Err(unexpected("vacuum_gauge", &other)),
        }
    }

    fn support_gauge(&self) -> bool {
        true
    }

    fn set(&self, on: bool) -> Result<CommandStatus, DeviceError> {
        let request = Request::SetVacuum {
            device: self.device_name.clone(),
            on,
        };
        match self.conn.roundtrip(&self.device_name, &request)? {
            Response::Status(status) => Ok(status),
            other => Err(unexpected("status", &other)),
        }
    }
}

struct RemoteColorCamera {
    conn: Arc<Connection>,
    device_name: String,
}

impl RemoteColorCamera {
    fn request_image(&self, timeout: Duration) -> Result<CameraFrame, DeviceError> {
        let request = Request::Image {
            device: self.device_name.clone(),
        };
        match self
            .conn
            .roundtrip_with_timeout(&self.device_name, &request, timeout)?
        {
            Response::Image(frame) => Ok(frame),
            other => Err(unexpected("image", &other)),
        }
    }
}

impl ColorCamera for RemoteColorCamera {
    fn device_name(&self) -> &str {
        &self.device_name
    }

    fn image(&self) -> Result<CameraFrame, DeviceError> {
        self.request_image(self.conn.read_timeout)
    }

    fn fetch_image(&self, timeout: Duration) -> Result<CameraFrame, DeviceError> {
        self.request_image(timeout)
    }
}

struct RemoteTextInstructions {
    conn: Arc<Connection>,
}

impl TextInstructions for RemoteTextInstructions {
    fn instruction(&self) -> Result<TextInstruction, DeviceError> {
        match self.conn.roundtrip("", &Request::TextInstruction)? {
            Response::TextInstruction(text) => Ok(text),
            other => Err(unexpected("text_instruction", &other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
