//! Serde adapters for the witness-file value forms: scalars as decimal
//! strings, byte strings as hex.

pub mod biguint_decimal {
    use num_bigint::BigUint;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_str_radix(10))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigUint, D::Error> {
        let s = String::deserialize(deserializer)?;
        BigUint::parse_bytes(s.as_bytes(), 10)
            .ok_or_else(|| serde::de::Error::custom("expected a decimal integer string"))
    }
}

pub mod fr_decimal {
    use halo2curves_axiom::bn256::Fr;
    use serde::{Deserialize, Deserializer, Serializer};
    use zkcred_crypto::field::{fr_from_decimal, fr_to_decimal};

    pub fn serialize<S: Serializer>(value: &Fr, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&fr_to_decimal(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Fr, D::Error> {
        let s = String::deserialize(deserializer)?;
        fr_from_decimal(&s).map_err(serde::de::Error::custom)
    }
}

pub mod fr_decimal_vec {
    use halo2curves_axiom::bn256::Fr;
    use serde::ser::SerializeSeq;
    use serde::{Deserialize, Deserializer, Serializer};
    use zkcred_crypto::field::{fr_from_decimal, fr_to_decimal};

    pub fn serialize<S: Serializer>(values: &[Fr], serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(values.len()))?;
        for value in values {
            seq.serialize_element(&fr_to_decimal(value))?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Fr>, D::Error> {
        let strings = Vec::<String>::deserialize(deserializer)?;
        strings
            .iter()
            .map(|s| fr_from_decimal(s).map_err(serde::de::Error::custom))
            .collect()
    }
}

pub mod fr_decimal_array {
    use halo2curves_axiom::bn256::Fr;
    use halo2curves_axiom::ff::Field;
    use serde::ser::SerializeSeq;
    use serde::{Deserialize, Deserializer, Serializer};
    use zkcred_crypto::field::{fr_from_decimal, fr_to_decimal};

    pub fn serialize<S: Serializer, const N: usize>(
        values: &[Fr; N],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(N))?;
        for value in values {
            seq.serialize_element(&fr_to_decimal(value))?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>, const N: usize>(
        deserializer: D,
    ) -> Result<[Fr; N], D::Error> {
        let strings = Vec::<String>::deserialize(deserializer)?;
        if strings.len() != N {
            return Err(serde::de::Error::custom(format!(
                "expected {} decimal scalar strings",
                N
            )));
        }
        let mut values = [Fr::zero(); N];
        for (slot, s) in strings.iter().enumerate() {
            values[slot] = fr_from_decimal(s).map_err(serde::de::Error::custom)?;
        }
        Ok(values)
    }
}

pub mod registers_decimal {
    use serde::ser::SerializeSeq;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        registers: &[u64; 4],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(4))?;
        for register in registers {
            seq.serialize_element(&register.to_string())?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<[u64; 4], D::Error> {
        let strings = <[String; 4]>::deserialize(deserializer)?;
        let mut registers = [0u64; 4];
        for (slot, s) in strings.iter().enumerate() {
            registers[slot] = s
                .parse::<u64>()
                .map_err(|_| serde::de::Error::custom("expected a decimal 64-bit register"))?;
        }
        Ok(registers)
    }
}

pub mod registers_decimal_pair {
    use serde::ser::SerializeSeq;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        pair: &[[u64; 4]; 2],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(2))?;
        for registers in pair {
            let strings: Vec<String> = registers.iter().map(|r| r.to_string()).collect();
            seq.serialize_element(&strings)?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<[[u64; 4]; 2], D::Error> {
        let rows = <[[String; 4]; 2]>::deserialize(deserializer)?;
        let mut pair = [[0u64; 4]; 2];
        for (row, strings) in rows.iter().enumerate() {
            for (slot, s) in strings.iter().enumerate() {
                pair[row][slot] = s
                    .parse::<u64>()
                    .map_err(|_| serde::de::Error::custom("expected a decimal 64-bit register"))?;
            }
        }
        Ok(pair)
    }
}

pub mod hex_array_32 {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8; 32], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{}", hex::encode(bytes)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<[u8; 32], D::Error> {
        let s = String::deserialize(deserializer)?;
        let stripped = s.strip_prefix("0x").unwrap_or(&s);
        let bytes = hex::decode(stripped).map_err(serde::de::Error::custom)?;
        bytes
            .try_into()
            .map_err(|_| serde::de::Error::custom("expected 32 hex-encoded bytes"))
    }
}
