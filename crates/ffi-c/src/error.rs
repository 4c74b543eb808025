#[repr(i32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StatusCode {
    Ok = 0,
    InvalidArg = 1,
    Convert = 2,
    Internal = 3,
}

impl StatusCode {
    #[inline]
    pub const fn code(self) -> i32 {
        self as i32
    }
}

impl From<StatusCode> for i32 {
    fn from(code: StatusCode) -> Self {
        code.code()
    }
}

pub const HS_OK: i32 = StatusCode::Ok.code();
pub const HS_ERR_INVALID_ARG: i32 = StatusCode::InvalidArg.code();
pub const HS_ERR_CONVERT: i32 = StatusCode::Convert.code();
pub const HS_ERR_INTERNAL: i32 = StatusCode::Internal.code();
