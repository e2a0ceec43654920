use super::error::ApiErrorCode;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Zh,
}

/// User-facing response texts in the operator's language.
#[derive(Debug, Clone, Copy)]
pub struct Messages {
    locale: Locale,
}

impl Messages {
    pub fn new(locale: Locale) -> Self {
        Messages { locale }
    }

    pub fn register_succeeded(&self) -> &'static str {
        match self.locale {
            Locale::En => "registration succeeded",
            Locale::Zh => "注册成功",
        }
    }

    pub fn login_succeeded(&self) -> &'static str {
        match self.locale {
            Locale::En => "login succeeded",
            Locale::Zh => "登录成功",
        }
    }

    pub fn error(&self, code: ApiErrorCode) -> &'static str {
        match (self.locale, code) {
            (Locale::En, ApiErrorCode::UsernameTaken) => "username already exists",
            (Locale::En, ApiErrorCode::UserNotFound) => "user does not exist",
            (Locale::En, ApiErrorCode::IncorrectPassword) => "incorrect password",
            (Locale::En, ApiErrorCode::InternalError) => "internal error",
            (Locale::Zh, ApiErrorCode::UsernameTaken) => "用户名已存在",
            (Locale::Zh, ApiErrorCode::UserNotFound) => "用户不存在",
            (Locale::Zh, ApiErrorCode::IncorrectPassword) => "密码错误",
            (Locale::Zh, ApiErrorCode::InternalError) => "服务器内部错误",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locale_parses_lowercase() {
        let locale: Locale = serde_json::from_str("\"zh\"").unwrap();
        assert_eq!(locale, Locale::Zh);
        assert!(serde_json::from_str::<Locale>("\"fr\"").is_err());
        assert_eq!(Locale::default(), Locale::En);
    }

    #[test]
    fn texts_follow_locale() {
        let en = Messages::new(Locale::En);
        let zh = Messages::new(Locale::Zh);

        assert_eq!(en.login_succeeded(), "login succeeded");
        assert_eq!(zh.login_succeeded(), "登录成功");
        assert_eq!(en.error(ApiErrorCode::UsernameTaken), "username already exists");
        assert_eq!(zh.error(ApiErrorCode::UsernameTaken), "用户名已存在");
        assert_eq!(zh.error(ApiErrorCode::IncorrectPassword), "密码错误");
    }
}
