//! 以字符串形式存储的枚举
//!
//! 数据库中统一保存 snake_case 字符串，API 上也以同样的字符串序列化。

/// 定义字符串枚举的宏
///
/// 自动生成：
/// - enum 定义（Serialize / Deserialize / TS）
/// - as_str() 方法 - 返回存储用字符串
/// - Display / FromStr 实现
#[macro_export]
macro_rules! define_string_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($variant:ident => $text:literal),* $(,)?
        }
    ) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            serde::Serialize,
            serde::Deserialize,
            ts_rs::TS,
        )]
        $(#[$meta])*
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )*
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant,)*];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)*
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)*
                    _ => Err(format!(
                        "Invalid {}: '{}'. Supported: {}",
                        stringify!($name),
                        s,
                        [$($text),*].join(", ")
                    )),
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    define_string_enum! {
        Sample {
            First => "first",
            SecondValue => "second_value",
        }
    }

    #[test]
    fn test_round_trip_through_str() {
        assert_eq!("second_value".parse::<Sample>(), Ok(Sample::SecondValue));
        assert_eq!(Sample::First.to_string(), "first");
        assert_eq!(Sample::ALL.len(), 2);
    }

    #[test]
    fn test_unknown_value_lists_supported() {
        let err = "third".parse::<Sample>().unwrap_err();
        assert!(err.contains("first, second_value"));
    }

    #[test]
    fn test_serde_uses_storage_string() {
        let json = serde_json::to_string(&Sample::SecondValue).unwrap();
        assert_eq!(json, "\"second_value\"");
        let back: Sample = serde_json::from_str("\"first\"").unwrap();
        assert_eq!(back, Sample::First);
    }
}
