use thiserror::Error;

/// The four user-triggered generation actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Recipes,
    WeeklyPlan,
    GenerateImage,
    EditImage,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Recipes => "recipes",
            Operation::WeeklyPlan => "weekly_plan",
            Operation::GenerateImage => "generate_image",
            Operation::EditImage => "edit_image",
        }
    }

    /// User-facing message shown when this operation fails for any
    /// service or decode reason.
    pub fn failure_message(&self) -> &'static str {
        match self {
            Operation::Recipes => {
                "حدث خطأ أثناء توليد الوصفات. تأكد من الاتصال بالإنترنت وحاول مرة أخرى."
            }
            Operation::WeeklyPlan => "تعذر إنشاء الخطة الأسبوعية حالياً. حاول مرة أخرى لاحقاً.",
            Operation::GenerateImage => "فشل توليد الصورة، يرجى المحاولة لاحقاً.",
            Operation::EditImage => "فشل تعديل الصورة، يرجى المحاولة لاحقاً.",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a service response could not be turned into domain objects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("response contained no text")]
    EmptyResponse,

    #[error("response text is not valid JSON: {0}")]
    MalformedJson(String),

    #[error("response contained no inline image data")]
    NoImageReturned,

    #[error("inline image data is not valid base64: {0}")]
    InvalidImageData(String),

    #[error("missing required field `{field}` in {item}")]
    MissingField { item: String, field: &'static str },

    #[error("field `{field}` in {item} has the wrong type: {reason}")]
    InvalidField {
        item: String,
        field: &'static str,
        reason: String,
    },

    #[error("{item} has an unexpected shape: {reason}")]
    UnexpectedShape { item: String, reason: String },

    #[error("response contained no {0}")]
    EmptyResult(&'static str),
}

/// Error surfaced by every generation entry point.
///
/// `Display` yields the localized message meant for the user. The underlying
/// transport or service error is logged where it happens and never carried
/// here verbatim.
#[derive(Debug, Error)]
pub enum ChefError {
    #[error("يجب ضبط GEMINI_API_KEY في ملف ‎.env‎ قبل استخدام ميزات التوليد.")]
    Configuration,

    #[error("{0}")]
    Validation(&'static str),

    #[error("{}", .operation.failure_message())]
    Service {
        operation: Operation,
        /// HTTP status when the service answered at all
        status: Option<u16>,
    },

    #[error("{}", .operation.failure_message())]
    Decode {
        operation: Operation,
        kind: DecodeError,
    },

    #[error("صيغة الصورة المخزنة غير صالحة.")]
    InvalidImage,
}

pub const EMPTY_INGREDIENTS: &str = "يرجى إدخال بعض المكونات";
pub const EMPTY_EDIT_INSTRUCTION: &str = "يرجى كتابة وصف للتعديل المطلوب";
pub const NO_IMAGE_TO_EDIT: &str = "لا توجد صورة مولدة لتعديلها";

impl ChefError {
    pub fn decode(operation: Operation, kind: DecodeError) -> Self {
        ChefError::Decode { operation, kind }
    }

    /// The decode failure kind, for diagnostics.
    pub fn decode_kind(&self) -> Option<&DecodeError> {
        match self {
            ChefError::Decode { kind, .. } => Some(kind),
            _ => None,
        }
    }

    pub fn operation(&self) -> Option<Operation> {
        match self {
            ChefError::Service { operation, .. } | ChefError::Decode { operation, .. } => {
                Some(*operation)
            }
            _ => None,
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, ChefError::Configuration)
    }
}
