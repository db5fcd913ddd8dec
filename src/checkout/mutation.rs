use crate::checkout::process::{CartItem, LineItem};
use crate::form::state::FormValues;
use crate::request::graphql::quote;

/// Address keys accepted by the commerce API, in the order they are written.
pub const ADDRESS_FIELDS: [&str; 9] = [
    "firstName",
    "lastName",
    "streetAddress1",
    "streetAddress2",
    "city",
    "postalCode",
    "country",
    "countryArea",
    "phone",
];

/// Everything a `checkoutCreate` call carries.
#[derive(Debug, Clone, PartialEq)]
pub struct PreCheckoutValues {
    pub email: String,
    pub lines: Vec<LineItem>,
    pub shipping_address: FormValues,
    pub billing_address: FormValues,
}

/// Reduce the cart to line items, preserving cart order.
pub fn make_lines(cart: &[CartItem]) -> Vec<LineItem> {
    cart.iter()
        .map(|item| LineItem {
            quantity: item.quantity,
            variant_id: item.variant_id.clone(),
        })
        .collect()
}

/// `{ quantity: 2, variantId: "A" }, { quantity: 1, variantId: "B" }`
pub fn construct_lines(lines: &[LineItem]) -> String {
    lines
        .iter()
        .map(|l| format!("{{ quantity: {}, variantId: {} }}", l.quantity, quote(&l.variant_id)))
        .collect::<Vec<_>>()
        .join(", ")
}

/// GraphQL input object for an address. Blank values are omitted so optional
/// fields fall back to server defaults.
pub fn address_input(values: &FormValues) -> String {
    let parts: Vec<String> = ADDRESS_FIELDS
        .iter()
        .filter_map(|key| {
            let value = values.get(*key)?.trim();
            (!value.is_empty()).then(|| format!("{}: {}", key, quote(value)))
        })
        .collect();
    format!("{{ {} }}", parts.join(", "))
}

const CHECKOUT_FIELDS: &str = r#"checkout {
      id
      token
      availableShippingMethods {
        id
        name
        price {
          amount
          currency
        }
      }
    }
    checkoutErrors {
      field
      message
      code
    }"#;

pub fn make_checkout_create_mutation(values: &PreCheckoutValues) -> String {
    format!(
        r#"mutation {{
  checkoutCreate(
    input: {{
      email: {}
      lines: [{}]
      shippingAddress: {}
      billingAddress: {}
    }}
  ) {{
    {}
  }}
}}"#,
        quote(&values.email),
        construct_lines(&values.lines),
        address_input(&values.shipping_address),
        address_input(&values.billing_address),
        CHECKOUT_FIELDS
    )
}

pub fn make_shipping_method_update_mutation(checkout_id: &str, shipping_method_id: &str) -> String {
    format!(
        r#"mutation {{
  checkoutShippingMethodUpdate(
    checkoutId: {}
    shippingMethodId: {}
  ) {{
    {}
  }}
}}"#,
        quote(checkout_id),
        quote(shipping_method_id),
        CHECKOUT_FIELDS
    )
}
