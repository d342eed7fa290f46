use {
    super::error::DomainError,
    super::money::{Currency, MoneyAmount},
    serde::{Deserialize, Serialize},
    std::fmt,
    uuid::Uuid,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayMethod {
    Card,
    EasyPay,
    Wallet,
}

impl PayMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::EasyPay => "easy_pay",
            Self::Wallet => "wallet",
        }
    }
}

impl fmt::Display for PayMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for PayMethod {
    type Error = DomainError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "card" => Ok(Self::Card),
            "easy_pay" => Ok(Self::EasyPay),
            "wallet" => Ok(Self::Wallet),
            other => Err(DomainError::Validation(format!(
                "unknown pay method: {other}"
            ))),
        }
    }
}

/// What the browser sends before opening the provider SDK.
#[derive(Debug, Clone, Deserialize)]
pub struct NewIntent {
    pub amount: MoneyAmount,
    pub order_name: String,
    #[serde(default = "default_currency")]
    pub currency: Currency,
    pub method: PayMethod,
}

fn default_currency() -> Currency {
    Currency::Krw
}

/// The buyer's declared intent, minted right before the provider SDK opens.
/// Never mutated; the order id is the merchant-side reference for the rest of
/// the flow.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentIntent {
    pub order_id: String,
    pub order_name: String,
    pub amount: MoneyAmount,
    pub currency: Currency,
    pub method: PayMethod,
}

impl PaymentIntent {
    pub fn mint(new: NewIntent) -> Self {
        Self {
            order_id: format!("order-{}", Uuid::now_v7()),
            order_name: new.order_name,
            amount: new.amount,
            currency: new.currency,
            method: new.method,
        }
    }
}
