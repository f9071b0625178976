//! Deletion notification message and locale handling.

use serde::Serialize;
use uuid::Uuid;

use crate::config::{DEFAULT_LANGUAGE, LANGUAGE_ZH_CN};

/// Languages messages can be rendered in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Locale {
    #[default]
    En,
    ZhCn,
}

impl Locale {
    /// Parse a language code, falling back to English.
    ///
    /// Accepts `zh-cn`, `zh_CN`, `zh-hans` and bare `zh` for Chinese.
    pub fn from_code(code: &str) -> Self {
        let normalized = code.trim().to_lowercase().replace('_', "-");
        match normalized.as_str() {
            LANGUAGE_ZH_CN | "zh" | "zh-hans" => Locale::ZhCn,
            _ => Locale::En,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Locale::En => DEFAULT_LANGUAGE,
            Locale::ZhCn => LANGUAGE_ZH_CN,
        }
    }

    /// Confirmation returned to the client after a deactivation.
    pub fn deactivation_confirmation(&self) -> &'static str {
        match self {
            Locale::En => "Operation succeeded.",
            Locale::ZhCn => "操作成功",
        }
    }
}

/// Values substituted into notification templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateContext {
    pub full_name: String,
    pub platform_name: String,
    pub contact_email: String,
}

/// An addressed, localized notification ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    /// Account the message is about; safe to log, unlike the recipient
    pub user_id: Uuid,
    pub recipient: String,
    pub locale: Locale,
    pub context: TemplateContext,
}

impl NotificationMessage {
    pub fn new(
        user_id: Uuid,
        recipient: impl Into<String>,
        locale: Locale,
        context: TemplateContext,
    ) -> Self {
        Self {
            user_id,
            recipient: recipient.into(),
            locale,
            context,
        }
    }

    /// Render subject and plain-text body of the deletion confirmation.
    pub fn render_deletion(&self) -> RenderedEmail {
        let ctx = &self.context;
        let name = if ctx.full_name.trim().is_empty() {
            match self.locale {
                Locale::En => "learner",
                Locale::ZhCn => "学员",
            }
        } else {
            ctx.full_name.as_str()
        };

        match self.locale {
            Locale::En => RenderedEmail {
                subject: format!("Your {} account has been deleted", ctx.platform_name),
                body: format!(
                    "Hello {name},\n\n\
                     We received your request to delete your {platform} account. \
                     The account has been deactivated and its personal data is \
                     scheduled for removal. You will no longer be able to sign in.\n\n\
                     If you did not request this, contact us at {contact}.\n\n\
                     The {platform} Team",
                    name = name,
                    platform = ctx.platform_name,
                    contact = ctx.contact_email,
                ),
            },
            Locale::ZhCn => RenderedEmail {
                subject: format!("您的{}账户已被删除", ctx.platform_name),
                body: format!(
                    "{name}，您好：\n\n\
                     我们已收到您删除{platform}账户的请求。该账户已停用，\
                     个人数据将被清除，您将无法再次登录。\n\n\
                     如果这不是您本人的操作，请联系 {contact}。\n\n\
                     {platform}团队",
                    name = name,
                    platform = ctx.platform_name,
                    contact = ctx.contact_email,
                ),
            },
        }
    }
}

/// Subject and body of an email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub body: String,
}
