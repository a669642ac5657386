//! Fakes for the hardware collaborators, driven by a virtual clock.

use std::cell::{Cell, RefCell};
use std::net::Ipv4Addr;
use std::rc::Rc;

use embassy_time::Instant;
use embedded_hal_async::delay::DelayNs;
use embedded_io_async::{ErrorKind, ErrorType, Read, ReadReady, Write};

use crate::clock::Clock;
use crate::config::{CalibrationConfig, EndpointConfig, LinkCredentials, TankGeometry};
use crate::link::{LinkHardware, LinkStatus};
use crate::sampler::AnalogInput;
use crate::upload::{Connection, Connector};

pub const CALIBRATION: CalibrationConfig = CalibrationConfig {
    reference_voltage: 5.0,
    raw_max: 1023,
    voltage_min: 0.5,
    voltage_max: 4.5,
    full_scale: 10.0,
};

pub const CREDENTIALS: LinkCredentials = LinkCredentials {
    ssid: "IOT",
    secret: "secret",
};

pub const ENDPOINT: EndpointConfig = EndpointConfig {
    host: "192.168.55.192",
    port: 8080,
};

pub const TANK: TankGeometry = TankGeometry {
    area_m2: 1.0,
    fluid_density_kg_m3: 1000.0,
};

/// Delays complete instantly and move virtual time forward.
#[derive(Clone, Default)]
pub struct FakeClock {
    micros: Rc<Cell<u64>>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.micros.get() / 1000
    }

    fn advance_us(&self, us: u64) {
        self.micros.set(self.micros.get() + us);
    }
}

impl DelayNs for FakeClock {
    async fn delay_ns(&mut self, ns: u32) {
        self.advance_us(u64::from(ns).div_ceil(1000));
    }

    async fn delay_us(&mut self, us: u32) {
        self.advance_us(u64::from(us));
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.advance_us(u64::from(ms) * 1000);
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Instant {
        Instant::from_micros(self.micros.get())
    }
}

#[derive(Clone)]
pub struct ConstantAdc {
    raw: u16,
    reads: Rc<Cell<u32>>,
}

impl ConstantAdc {
    pub fn new(raw: u16) -> Self {
        Self {
            raw,
            reads: Rc::default(),
        }
    }

    pub fn reads(&self) -> u32 {
        self.reads.get()
    }
}

impl AnalogInput for ConstantAdc {
    fn read_raw(&mut self) -> u16 {
        self.reads.set(self.reads.get() + 1);
        self.raw
    }
}

#[derive(Default)]
struct LinkScript {
    up: bool,
    connect_after_polls: Option<u32>,
    polls_since_associate: u32,
    associations: u32,
    associated_with: Option<(String, String)>,
}

/// Radio whose status follows a fixed script.
#[derive(Clone, Default)]
pub struct ScriptedLink {
    script: Rc<RefCell<LinkScript>>,
}

impl ScriptedLink {
    pub fn connected() -> Self {
        let link = Self::default();
        link.script.borrow_mut().up = true;
        link
    }

    pub fn never() -> Self {
        Self::default()
    }

    /// Reports connected on the `polls`-th status poll following an association.
    pub fn connects_after(polls: u32) -> Self {
        let link = Self::default();
        link.script.borrow_mut().connect_after_polls = Some(polls);
        link
    }

    pub fn drop_link(&self) {
        self.script.borrow_mut().up = false;
    }

    pub fn associations(&self) -> u32 {
        self.script.borrow().associations
    }

    pub fn associated_with(&self) -> Option<(String, String)> {
        self.script.borrow().associated_with.clone()
    }
}

impl LinkHardware for ScriptedLink {
    fn associate(&mut self, ssid: &str, secret: &str) {
        let mut script = self.script.borrow_mut();
        script.associations += 1;
        script.polls_since_associate = 0;
        script.associated_with = Some((ssid.to_string(), secret.to_string()));
    }

    fn link_status(&mut self) -> LinkStatus {
        let mut script = self.script.borrow_mut();
        if script.associations > 0 {
            script.polls_since_associate += 1;
            if let Some(polls) = script.connect_after_polls {
                if script.polls_since_associate >= polls {
                    script.up = true;
                }
            }
        }

        if script.up {
            LinkStatus::Connected
        } else if script.associations > 0 {
            LinkStatus::Disconnected
        } else {
            LinkStatus::Idle
        }
    }

    fn local_address(&self) -> Option<Ipv4Addr> {
        self.script
            .borrow()
            .up
            .then(|| Ipv4Addr::new(192, 168, 1, 100))
    }
}

#[derive(Default)]
struct TransportScript {
    accept: bool,
    fail_writes: bool,
    respond_after_ms: Option<u64>,
    response: Vec<u8>,
    // peer closes once the response is consumed
    hang_up: bool,
    // reads fail once this many response bytes were delivered
    fail_read_at: Option<usize>,
    position: usize,
    opened_at_ms: u64,
    written: Vec<u8>,
    opened: u32,
    closed: u32,
}

/// Transport with a canned response, recording what was sent.
#[derive(Clone)]
pub struct FakeConnector {
    clock: FakeClock,
    script: Rc<RefCell<TransportScript>>,
}

impl FakeConnector {
    fn with_script(clock: FakeClock, script: TransportScript) -> Self {
        Self {
            clock,
            script: Rc::new(RefCell::new(script)),
        }
    }

    pub fn responding(clock: FakeClock, after_ms: u64, response: &[u8]) -> Self {
        Self::with_script(
            clock,
            TransportScript {
                accept: true,
                respond_after_ms: Some(after_ms),
                response: response.to_vec(),
                ..Default::default()
            },
        )
    }

    pub fn silent(clock: FakeClock) -> Self {
        Self::with_script(
            clock,
            TransportScript {
                accept: true,
                ..Default::default()
            },
        )
    }

    /// Sends `response` after `after_ms`, then closes its end of the stream.
    pub fn hanging_up(clock: FakeClock, after_ms: u64, response: &[u8]) -> Self {
        Self::with_script(
            clock,
            TransportScript {
                accept: true,
                respond_after_ms: Some(after_ms),
                response: response.to_vec(),
                hang_up: true,
                ..Default::default()
            },
        )
    }

    /// Like [`FakeConnector::responding`], but the connection resets after
    /// `delivered` bytes.
    pub fn resetting(clock: FakeClock, after_ms: u64, response: &[u8], delivered: usize) -> Self {
        Self::with_script(
            clock,
            TransportScript {
                accept: true,
                respond_after_ms: Some(after_ms),
                response: response.to_vec(),
                fail_read_at: Some(delivered),
                ..Default::default()
            },
        )
    }

    pub fn refusing(clock: FakeClock) -> Self {
        Self::with_script(clock, TransportScript::default())
    }

    pub fn broken_pipe(clock: FakeClock) -> Self {
        Self::with_script(
            clock,
            TransportScript {
                accept: true,
                fail_writes: true,
                ..Default::default()
            },
        )
    }

    /// Answers future connections `after_ms` after they are opened.
    pub fn respond_after(&self, after_ms: u64, response: &[u8]) {
        let mut script = self.script.borrow_mut();
        script.respond_after_ms = Some(after_ms);
        script.response = response.to_vec();
        script.position = 0;
    }

    /// A connection opened now, bypassing [`Connector::open`].
    pub fn connection(&self) -> FakeConnection {
        let mut script = self.script.borrow_mut();
        script.opened += 1;
        script.position = 0;
        script.opened_at_ms = self.clock.elapsed_ms();
        FakeConnection {
            clock: self.clock.clone(),
            script: self.script.clone(),
        }
    }

    pub fn opened(&self) -> u32 {
        self.script.borrow().opened
    }

    pub fn closed(&self) -> u32 {
        self.script.borrow().closed
    }

    pub fn written(&self) -> Vec<u8> {
        self.script.borrow().written.clone()
    }

    pub fn remaining(&self) -> usize {
        let script = self.script.borrow();
        script.response.len() - script.position
    }
}

impl Connector for FakeConnector {
    type Error = ErrorKind;
    type Connection<'c> = FakeConnection where Self: 'c;

    async fn open(
        &mut self,
        _host: &str,
        _port: u16,
    ) -> Result<Self::Connection<'_>, Self::Error> {
        if !self.script.borrow().accept {
            self.script.borrow_mut().opened += 1;
            return Err(ErrorKind::ConnectionRefused);
        }
        Ok(self.connection())
    }
}

pub struct FakeConnection {
    clock: FakeClock,
    script: Rc<RefCell<TransportScript>>,
}

impl FakeConnection {
    fn responded(&self) -> bool {
        let script = self.script.borrow();
        match script.respond_after_ms {
            Some(after) => self.clock.elapsed_ms() >= script.opened_at_ms + after,
            None => false,
        }
    }

    fn has_data(&self) -> bool {
        let script = self.script.borrow();
        self.responded() && (script.position < script.response.len() || script.hang_up)
    }
}

impl ErrorType for FakeConnection {
    type Error = ErrorKind;
}

impl Read for FakeConnection {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, ErrorKind> {
        if !self.has_data() {
            return Ok(0);
        }
        let mut script = self.script.borrow_mut();
        let start = script.position;
        let mut end = script.response.len();
        if let Some(at) = script.fail_read_at {
            if start >= at {
                return Err(ErrorKind::ConnectionReset);
            }
            end = end.min(at);
        }
        let n = buf.len().min(end - start);
        buf[..n].copy_from_slice(&script.response[start..start + n]);
        script.position += n;
        Ok(n)
    }
}

impl ReadReady for FakeConnection {
    fn read_ready(&mut self) -> Result<bool, ErrorKind> {
        Ok(self.has_data())
    }
}

impl Write for FakeConnection {
    async fn write(&mut self, buf: &[u8]) -> Result<usize, ErrorKind> {
        let mut script = self.script.borrow_mut();
        if script.fail_writes {
            return Err(ErrorKind::BrokenPipe);
        }
        script.written.extend_from_slice(buf);
        Ok(buf.len())
    }

    async fn flush(&mut self) -> Result<(), ErrorKind> {
        Ok(())
    }
}

impl Connection for FakeConnection {
    fn close(&mut self) {
        self.script.borrow_mut().closed += 1;
    }
}
